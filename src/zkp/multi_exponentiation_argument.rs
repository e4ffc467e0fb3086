//! Multi-Exponentiation Argument: proves knowledge of an exponent matrix `A`
//! (n×m) and scalar `ρ` linking a public ciphertext matrix `C` (m×n) to a
//! target ciphertext, `target = E(1; ρ) · ∏_{i,j} C_{i,j}^{A_{j,i}}`.
//!
//! `ShuffleArg` invokes this alongside `ProductArg` to close its verification.

use std::sync::Arc;

use rand::RngCore;

use crate::commitment::CommitmentKey;
use crate::elgamal::{encrypt_message, encrypt_neutral, Ciphertext, PublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::matrix::GroupMatrix;
use crate::group::params::{GqGroup, ZqGroup};
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};
use crate::zkp::VerificationResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiExponentiationStatement {
    ciphertexts: GroupMatrix<Ciphertext>,
    target: Ciphertext,
    c_a: GroupVector<GqElement>,
    pk: PublicKey,
    generator: GqElement,
}

impl MultiExponentiationStatement {
    pub fn new(
        ciphertexts: GroupMatrix<Ciphertext>,
        target: Ciphertext,
        c_a: GroupVector<GqElement>,
        pk: PublicKey,
        generator: GqElement,
    ) -> CryptoResult<Self> {
        if ciphertexts.num_rows() != c_a.len() {
            return Err(CryptoError::invalid("ciphertext matrix row count must equal c_A's length (m)"));
        }
        if pk.len() != target.width() {
            return Err(CryptoError::invalid("public key width must equal the target ciphertext's width"));
        }
        Ok(MultiExponentiationStatement { ciphertexts, target, c_a, pk, generator })
    }

    pub fn m(&self) -> usize {
        self.ciphertexts.num_rows()
    }

    pub fn n(&self) -> usize {
        self.ciphertexts.num_columns()
    }

    pub fn ciphertexts(&self) -> &GroupMatrix<Ciphertext> {
        &self.ciphertexts
    }

    pub fn target(&self) -> &Ciphertext {
        &self.target
    }

    pub fn c_a(&self) -> &GroupVector<GqElement> {
        &self.c_a
    }

    pub fn pk(&self) -> &PublicKey {
        &self.pk
    }

    fn to_hashable(&self) -> Hashable {
        Hashable::list([
            Hashable::list(self.c_a.iter().map(Hashable::from)),
            Hashable::from(&self.target.gamma()),
            Hashable::list(self.target.phis().iter().map(Hashable::from)),
        ])
    }
}

#[derive(Clone, Debug)]
pub struct MultiExponentiationWitness {
    a: GroupMatrix<ZqElement>,
    r: GroupVector<ZqElement>,
    rho: ZqElement,
}

impl MultiExponentiationWitness {
    pub fn new(a: GroupMatrix<ZqElement>, r: GroupVector<ZqElement>, rho: ZqElement) -> CryptoResult<Self> {
        if r.len() != a.num_columns() {
            return Err(CryptoError::invalid("randomness vector length must equal A's column count (m)"));
        }
        Ok(MultiExponentiationWitness { a, r, rho })
    }

    pub fn n(&self) -> usize {
        self.a.num_rows()
    }

    pub fn m(&self) -> usize {
        self.a.num_columns()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiExponentiationArgument {
    c_a_0: GqElement,
    c_b: GroupVector<GqElement>,
    e: Vec<Ciphertext>,
    a: GroupVector<ZqElement>,
    r: ZqElement,
    b: ZqElement,
    s: ZqElement,
    tau: ZqElement,
}

impl MultiExponentiationArgument {
    pub fn c_a_0(&self) -> &GqElement {
        &self.c_a_0
    }
    pub fn c_b(&self) -> &GroupVector<GqElement> {
        &self.c_b
    }
    pub fn e(&self) -> &[Ciphertext] {
        &self.e
    }
}

fn row_multi_exp(row: &[Ciphertext], exponents: &[ZqElement]) -> CryptoResult<Ciphertext> {
    if row.len() != exponents.len() {
        return Err(CryptoError::invalid("row_multi_exp requires matching row/exponent lengths"));
    }
    let mut acc: Option<Ciphertext> = None;
    for (c, e) in row.iter().zip(exponents.iter()) {
        let term = c.exponentiate(e)?;
        acc = Some(match acc {
            None => term,
            Some(prev) => prev.multiply(&term)?,
        });
    }
    acc.ok_or_else(|| CryptoError::invalid("row_multi_exp requires at least one ciphertext"))
}

fn ciphertext_identity(width: usize, group: Arc<GqGroup>) -> CryptoResult<Ciphertext> {
    Ciphertext::neutral(width, group)
}

pub fn prove<R: RngCore>(
    statement: &MultiExponentiationStatement,
    witness: &MultiExponentiationWitness,
    ck: &CommitmentKey,
    rng: &mut R,
) -> CryptoResult<MultiExponentiationArgument> {
    let m = statement.m();
    let n = statement.n();
    if witness.m() != m || witness.n() != n {
        return Err(CryptoError::invalid("witness dimensions do not match statement"));
    }
    let group = statement.ciphertexts.group().clone();
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());
    let width = statement.target.width();

    // A'_0 = a_0 (random), A'_i = witness A's column i-1, for i = 1..m.
    let a0: Vec<ZqElement> = (0..n).map(|_| ZqElement::random(rng, zq.clone())).collect();
    let r0 = ZqElement::random(rng, zq.clone());
    let mut a_ext: Vec<Vec<ZqElement>> = Vec::with_capacity(m + 1);
    a_ext.push(a0.clone());
    for col in witness.a.columns() {
        a_ext.push(col.into_iter().cloned().collect());
    }
    let mut r_ext = vec![r0.clone()];
    r_ext.extend(witness.r.iter().cloned());

    // Reversed-and-padded row sequence: C'_j = C's row (m-1-j) for j=0..m-1,
    // C'_m = a neutral (identity) row.
    let mut c_ext: Vec<Vec<Ciphertext>> = (0..m).map(|row| statement.ciphertexts.get_row(m - 1 - row).expect("row in range").to_vec()).collect();
    c_ext.push((0..n).map(|_| ciphertext_identity(width, group.clone())).collect::<CryptoResult<Vec<_>>>()?);

    let two_m = 2 * m;
    let mut b = Vec::with_capacity(two_m);
    let mut s = Vec::with_capacity(two_m);
    let mut tau = Vec::with_capacity(two_m);
    for k in 0..two_m {
        if k == m {
            b.push(ZqElement::zero(zq.clone()));
            s.push(ZqElement::zero(zq.clone()));
            tau.push(witness.rho.clone());
        } else {
            b.push(ZqElement::random(rng, zq.clone()));
            s.push(ZqElement::random(rng, zq.clone()));
            tau.push(ZqElement::random(rng, zq.clone()));
        }
    }

    let mut e = Vec::with_capacity(two_m);
    for k in 0..two_m {
        let mut raw: Option<Ciphertext> = None;
        for i in 0..=m {
            if k >= i && k - i <= m {
                let j = k - i;
                let term = row_multi_exp(&c_ext[j], &a_ext[i])?;
                raw = Some(match raw {
                    None => term,
                    Some(prev) => prev.multiply(&term)?,
                });
            }
        }
        let raw = raw.ok_or_else(|| CryptoError::invalid("diagonal product has no valid terms"))?;
        let message = statement.generator.exponentiate(&b[k])?;
        let blind = encrypt_message(&message, &tau[k], &statement.generator, &statement.pk)?;
        e.push(raw.multiply(&blind)?);
    }

    let c_b: Vec<GqElement> = b
        .iter()
        .zip(s.iter())
        .map(|(b_k, s_k)| crate::commitment::get_commitment(&GroupVector::new(vec![b_k.clone()])?, s_k, ck))
        .collect::<CryptoResult<Vec<_>>>()?;
    let c_b = GroupVector::new(c_b)?;
    let c_a_0 = crate::commitment::get_commitment(&GroupVector::new(a0)?, &r0, ck)?;

    let mut transcript = vec![statement.to_hashable(), Hashable::from(&c_a_0)];
    transcript.push(Hashable::list(c_b.iter().map(Hashable::from)));
    transcript.push(Hashable::list(e.iter().flat_map(|c| {
        std::iter::once(Hashable::from(c.gamma())).chain(c.phis().iter().map(Hashable::from))
    })));
    let hasher = HashTranscript::new(&zq);
    let x = hasher.challenge(&transcript, zq.clone())?;

    let mut a_resp = vec![ZqElement::zero(zq.clone()); n];
    let mut r_resp = ZqElement::zero(zq.clone());
    let mut x_power = ZqElement::one(zq.clone());
    for i in 0..=m {
        for l in 0..n {
            a_resp[l] = a_resp[l].add(&a_ext[i][l].multiply(&x_power)?)?;
        }
        r_resp = r_resp.add(&r_ext[i].multiply(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }

    let mut b_resp = ZqElement::zero(zq.clone());
    let mut s_resp = ZqElement::zero(zq.clone());
    let mut tau_resp = ZqElement::zero(zq.clone());
    let mut x_power = ZqElement::one(zq.clone());
    for k in 0..two_m {
        b_resp = b_resp.add(&b[k].multiply(&x_power)?)?;
        s_resp = s_resp.add(&s[k].multiply(&x_power)?)?;
        tau_resp = tau_resp.add(&tau[k].multiply(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }

    Ok(MultiExponentiationArgument {
        c_a_0,
        c_b,
        e,
        a: GroupVector::new(a_resp)?,
        r: r_resp,
        b: b_resp,
        s: s_resp,
        tau: tau_resp,
    })
}

pub fn verify(
    statement: &MultiExponentiationStatement,
    argument: &MultiExponentiationArgument,
    ck: &CommitmentKey,
) -> CryptoResult<VerificationResult> {
    let m = statement.m();
    let n = statement.n();
    let two_m = 2 * m;
    if argument.e.len() != two_m || argument.c_b.len() != two_m {
        return Ok(VerificationResult::failed("multi-exponentiation argument has the wrong number of diagonals"));
    }
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());

    let mut transcript = vec![statement.to_hashable(), Hashable::from(&argument.c_a_0)];
    transcript.push(Hashable::list(argument.c_b.iter().map(Hashable::from)));
    transcript.push(Hashable::list(argument.e.iter().flat_map(|c| {
        std::iter::once(Hashable::from(c.gamma())).chain(c.phis().iter().map(Hashable::from))
    })));
    let hasher = HashTranscript::new(&zq);
    let x = hasher.challenge(&transcript, zq.clone())?;

    // Check 1: com(a; r) == c_A0^{x^0} * prod_{i=1}^m c_A[i-1]^{x^i}
    let lhs1 = crate::commitment::get_commitment(&argument.a, &argument.r, ck)?;
    let mut rhs1 = argument.c_a_0.clone();
    let mut x_power = x.clone();
    for c_a_i in statement.c_a.iter() {
        rhs1 = rhs1.multiply(&c_a_i.exponentiate(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }
    if lhs1 != rhs1 {
        return Ok(VerificationResult::failed("multi-exponentiation argument check 1 failed"));
    }

    // Check 2: com(b; s) == prod_{k=0}^{2m-1} c_B[k]^{x^k}
    let lhs2 = crate::commitment::get_commitment(&GroupVector::new(vec![argument.b.clone()])?, &argument.s, ck)?;
    let mut rhs2 = GqElement::identity(ck.group().clone());
    let mut x_power = ZqElement::one(zq.clone());
    for c_b_k in argument.c_b.iter() {
        rhs2 = rhs2.multiply(&c_b_k.exponentiate(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }
    if lhs2 != rhs2 {
        return Ok(VerificationResult::failed("multi-exponentiation argument check 2 failed"));
    }

    // Check 3: prod_k E_k^{x^k} == E(g^b; tau) * row_multi_exp(combined columns; a)
    let mut lhs3: Option<Ciphertext> = None;
    let mut x_power = ZqElement::one(zq.clone());
    for e_k in argument.e.iter() {
        let term = e_k.exponentiate(&x_power)?;
        lhs3 = Some(match lhs3 {
            None => term,
            Some(prev) => prev.multiply(&term)?,
        });
        x_power = x_power.multiply(&x)?;
    }
    let lhs3 = lhs3.ok_or_else(|| CryptoError::invalid("no diagonal terms"))?;

    let mut combined: Vec<Ciphertext> = Vec::with_capacity(n);
    for l in 0..n {
        let mut acc: Option<Ciphertext> = None;
        for row in 0..m {
            let cell = statement
                .ciphertexts
                .get(row, l)
                .ok_or_else(|| CryptoError::invalid("ciphertext matrix index out of bounds"))?;
            let exponent = x.pow((m - 1 - row) as u64);
            let term = cell.exponentiate(&exponent)?;
            acc = Some(match acc {
                None => term,
                Some(prev) => prev.multiply(&term)?,
            });
        }
        combined.push(acc.ok_or_else(|| CryptoError::invalid("m must be at least 1"))?);
    }
    let row_term = row_multi_exp(&combined, argument.a.as_slice())?;
    let message = statement.generator.exponentiate(&argument.b)?;
    let blind = encrypt_message(&message, &argument.tau, &statement.generator, &statement.pk)?;
    let rhs3 = blind.multiply(&row_term)?;

    if lhs3 != rhs3 {
        return Ok(VerificationResult::failed("multi-exponentiation argument check 3 failed"));
    }

    Ok(VerificationResult::Verified)
}

#[allow(unused_imports)]
use crate::group::vector::GroupVector as _GroupVectorUnused;
