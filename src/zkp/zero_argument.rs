//! Zero Argument: proves `Σ_{i=1}^m a_i ⋆_y b_i = 0` for committed matrices
//! `A`, `B`, under the bilinear map `a ⋆_y b = Σ_{j=1}^n a_j · b_j · y^j`.
//!
//! Every other argument in this crate bottoms out here: `HadamardArg`
//! reduces to one `ZeroArg` instance, and `ProductArg` composes
//! `HadamardArg` with `SingleValueProductArg`.

use std::sync::Arc;

use rand::RngCore;

use crate::commitment::{get_commitment, CommitmentKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::matrix::GroupMatrix;
use crate::group::params::ZqGroup;
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};
use crate::zkp::VerificationResult;

const LOG_TARGET: &str = "bgshuffle::zkp::zero_argument";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroStatement {
    c_a: GroupVector<GqElement>,
    c_b: GroupVector<GqElement>,
    y: ZqElement,
}

impl ZeroStatement {
    pub fn new(c_a: GroupVector<GqElement>, c_b: GroupVector<GqElement>, y: ZqElement) -> CryptoResult<Self> {
        c_a.check_compatible(&c_b)?;
        Ok(ZeroStatement { c_a, c_b, y })
    }

    pub fn m(&self) -> usize {
        self.c_a.len()
    }

    pub fn c_a(&self) -> &GroupVector<GqElement> {
        &self.c_a
    }

    pub fn c_b(&self) -> &GroupVector<GqElement> {
        &self.c_b
    }

    pub fn y(&self) -> &ZqElement {
        &self.y
    }

    fn to_hashable(&self) -> Hashable {
        Hashable::list([
            Hashable::list(self.c_a.iter().map(Hashable::from)),
            Hashable::list(self.c_b.iter().map(Hashable::from)),
            Hashable::from(&self.y),
        ])
    }
}

#[derive(Clone, Debug)]
pub struct ZeroWitness {
    a: GroupMatrix<ZqElement>,
    b: GroupMatrix<ZqElement>,
    r: GroupVector<ZqElement>,
    s: GroupVector<ZqElement>,
}

impl ZeroWitness {
    pub fn new(
        a: GroupMatrix<ZqElement>,
        b: GroupMatrix<ZqElement>,
        r: GroupVector<ZqElement>,
        s: GroupVector<ZqElement>,
    ) -> CryptoResult<Self> {
        if a.num_rows() != b.num_rows() || a.num_columns() != b.num_columns() {
            return Err(CryptoError::invalid("ZeroWitness requires A and B to have equal dimensions"));
        }
        if r.len() != a.num_columns() || s.len() != a.num_columns() {
            return Err(CryptoError::invalid("ZeroWitness randomness length must equal the matrices' column count"));
        }
        Ok(ZeroWitness { a, b, r, s })
    }

    pub fn n(&self) -> usize {
        self.a.num_rows()
    }

    pub fn m(&self) -> usize {
        self.a.num_columns()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroArgument {
    c_a0: GqElement,
    c_bm: GqElement,
    c_d: GroupVector<GqElement>,
    a_prime: GroupVector<ZqElement>,
    b_prime: GroupVector<ZqElement>,
    r_prime: ZqElement,
    s_prime: ZqElement,
    t_prime: ZqElement,
}

impl ZeroArgument {
    pub fn c_a0(&self) -> &GqElement {
        &self.c_a0
    }
    pub fn c_bm(&self) -> &GqElement {
        &self.c_bm
    }
    pub fn c_d(&self) -> &GroupVector<GqElement> {
        &self.c_d
    }
}

/// `a ⋆_y b = Σ_{j=1}^n a_j b_j y^j`, the bilinear map every level of the
/// shuffle argument reduces to.
pub(crate) fn bilinear_y(a: &[ZqElement], b: &[ZqElement], y: &ZqElement) -> CryptoResult<ZqElement> {
    if a.len() != b.len() {
        return Err(CryptoError::invalid("bilinear_y requires equal-length vectors"));
    }
    let zq = y.group_arc().clone();
    let mut acc = ZqElement::zero(zq);
    let mut y_power = y.clone();
    for (aj, bj) in a.iter().zip(b.iter()) {
        let term = aj.multiply(bj)?.multiply(&y_power)?;
        acc = acc.add(&term)?;
        y_power = y_power.multiply(y)?;
    }
    Ok(acc)
}

pub(crate) fn scale_vector(v: &[ZqElement], scalar: &ZqElement) -> CryptoResult<Vec<ZqElement>> {
    v.iter().map(|e| e.multiply(scalar)).collect()
}

pub(crate) fn add_vectors(a: &[ZqElement], b: &[ZqElement]) -> CryptoResult<Vec<ZqElement>> {
    a.iter().zip(b.iter()).map(|(x, y)| x.add(y)).collect()
}

/// Builds the length-(m+1) extended `A` sequence: `a_0` (random) followed by
/// the witness's original columns `a_1..a_m`.
fn extend_a(a0: Vec<ZqElement>, witness_a: &GroupMatrix<ZqElement>) -> Vec<Vec<ZqElement>> {
    let mut out = Vec::with_capacity(witness_a.num_columns() + 1);
    out.push(a0);
    for col in witness_a.columns() {
        out.push(col.into_iter().cloned().collect());
    }
    out
}

/// Builds the length-(m+1) extended `B` sequence: the witness's columns
/// `b_1..b_m` in REVERSE order, followed by the zero column. Reversal is
/// what makes the convolution's center coefficient land on the diagonal
/// `Σ a_i ⋆_y b_i` rather than a shifted sum.
fn extend_b(witness_b: &GroupMatrix<ZqElement>, zero_col: Vec<ZqElement>) -> Vec<Vec<ZqElement>> {
    let mut out: Vec<Vec<ZqElement>> = witness_b.columns().map(|c| c.into_iter().cloned().collect()).collect();
    out.reverse();
    out.push(zero_col);
    out
}

pub fn prove<R: RngCore>(
    statement: &ZeroStatement,
    witness: &ZeroWitness,
    ck: &CommitmentKey,
    rng: &mut R,
) -> CryptoResult<ZeroArgument> {
    let m = statement.m();
    if witness.m() != m {
        return Err(CryptoError::invalid("witness column count does not match statement length"));
    }
    let n = witness.n();
    tracing::debug!(target: LOG_TARGET, m, n, "proving zero argument");
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());

    let a0: Vec<ZqElement> = (0..n).map(|_| ZqElement::random(rng, zq.clone())).collect();
    let r0 = ZqElement::random(rng, zq.clone());
    let zero_col: Vec<ZqElement> = (0..n).map(|_| ZqElement::zero(zq.clone())).collect();
    let s_extra = ZqElement::zero(zq.clone());

    let a_ext = extend_a(a0.clone(), &witness.a);
    let b_ext = extend_b(&witness.b, zero_col);

    let mut r_ext = vec![r0.clone()];
    r_ext.extend(witness.r.iter().cloned());
    let mut s_ext: Vec<ZqElement> = witness.s.iter().cloned().collect();
    s_ext.reverse();
    s_ext.push(s_extra.clone());

    let c_a0 = get_commitment(&GroupVector::new(a0.clone())?, &r0, ck)?;
    let c_bm = get_commitment(&GroupVector::new(b_ext[m].clone())?, &s_extra, ck)?;

    let two_m = 2 * m;
    let mut d = Vec::with_capacity(two_m + 1);
    let mut t = Vec::with_capacity(two_m + 1);
    for k in 0..=two_m {
        let mut d_k = ZqElement::zero(zq.clone());
        for i in 0..=m {
            if k >= i && k - i <= m {
                let j = k - i;
                let term = bilinear_y(&a_ext[i], &b_ext[j], statement.y())?;
                d_k = d_k.add(&term)?;
            }
        }
        d.push(d_k);
        t.push(if k == m { ZqElement::zero(zq.clone()) } else { ZqElement::random(rng, zq.clone()) });
    }

    let c_d: Vec<GqElement> = d
        .iter()
        .zip(t.iter())
        .map(|(d_k, t_k)| get_commitment(&GroupVector::new(vec![d_k.clone()])?, t_k, ck))
        .collect::<CryptoResult<Vec<_>>>()?;
    let c_d = GroupVector::new(c_d)?;

    let mut transcript = vec![statement.to_hashable(), Hashable::from(&c_a0), Hashable::from(&c_bm)];
    transcript.push(Hashable::list(c_d.iter().map(Hashable::from)));
    let hasher = HashTranscript::new(&zq);
    let x = hasher.challenge(&transcript, zq.clone())?;

    // a' = Σ_i x^i A_i, r' = Σ_i x^i r_i  (i = 0..m)
    let mut a_prime = a_ext[0].clone();
    let mut r_prime = r_ext[0].clone();
    let mut x_power = x.clone();
    for i in 1..=m {
        a_prime = add_vectors(&a_prime, &scale_vector(&a_ext[i], &x_power)?)?;
        r_prime = r_prime.add(&r_ext[i].multiply(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }

    // b' = Σ_j x^{m-j} B_j, s' = Σ_j x^{m-j} s_j  (j = 0..m)
    let mut b_prime = vec![ZqElement::zero(zq.clone()); n];
    let mut s_prime = ZqElement::zero(zq.clone());
    for j in 0..=m {
        let exponent = (m - j) as u64;
        let weight = x.pow(exponent);
        b_prime = add_vectors(&b_prime, &scale_vector(&b_ext[j], &weight)?)?;
        s_prime = s_prime.add(&s_ext[j].multiply(&weight)?)?;
    }

    // t' = Σ_k x^k t_k  (k = 0..2m)
    let mut t_prime = ZqElement::zero(zq.clone());
    let mut x_power = ZqElement::one(zq.clone());
    for t_k in &t {
        t_prime = t_prime.add(&t_k.multiply(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }

    Ok(ZeroArgument {
        c_a0,
        c_bm,
        c_d,
        a_prime: GroupVector::new(a_prime)?,
        b_prime: GroupVector::new(b_prime)?,
        r_prime,
        s_prime,
        t_prime,
    })
}

pub fn verify(statement: &ZeroStatement, argument: &ZeroArgument, ck: &CommitmentKey) -> CryptoResult<VerificationResult> {
    let m = statement.m();
    tracing::debug!(target: LOG_TARGET, m, "verifying zero argument");
    if argument.c_d.len() != 2 * m + 1 {
        tracing::warn!(target: LOG_TARGET, "zero argument rejected: c_d has the wrong length for m");
        return Ok(VerificationResult::failed("c_d has the wrong length for m"));
    }
    // d_m is the diagonal sum Σ_i a_i ⋆_y b_i itself (k = i + m - j with
    // i = j), so the prover must commit to it with t_m = 0; since the sum
    // the whole argument exists to prove is zero iff this commitment is the
    // identity, the verifier has to check it rather than trust it.
    let c_d_m = argument.c_d.get(m).expect("length checked above");
    if !c_d_m.is_identity() {
        tracing::warn!(target: LOG_TARGET, "zero argument rejected: c_d[m] is not com(0; 0)");
        return Ok(VerificationResult::failed("c_d[m] is not a commitment to zero"));
    }
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());

    let mut transcript = vec![statement.to_hashable(), Hashable::from(&argument.c_a0), Hashable::from(&argument.c_bm)];
    transcript.push(Hashable::list(argument.c_d.iter().map(Hashable::from)));
    let hasher = HashTranscript::new(&zq);
    let x = hasher.challenge(&transcript, zq.clone())?;

    // Check 1: com(a'; r') == c_A0^{x^0} * prod_{i=1}^m c_A[i-1]^{x^i}
    let lhs1 = get_commitment(&argument.a_prime, &argument.r_prime, ck)?;
    let mut rhs1 = argument.c_a0.clone();
    let mut x_power = x.clone();
    for c_a_i in statement.c_a().iter() {
        rhs1 = rhs1.multiply(&c_a_i.exponentiate(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }
    if lhs1 != rhs1 {
        tracing::warn!(target: LOG_TARGET, "zero argument rejected: check 1 failed");
        return Ok(VerificationResult::failed("zero argument check 1 failed"));
    }

    // Check 2: com(b'; s') == prod_{j=0}^{m-1} c_B_reversed[j]^{x^{m-j}} * c_Bm^{x^0}
    let lhs2 = get_commitment(&argument.b_prime, &argument.s_prime, ck)?;
    let c_b_rev: Vec<&GqElement> = statement.c_b().iter().rev().collect();
    let mut rhs2 = GqElement::identity(ck.group().clone());
    for (j, c_b_j) in c_b_rev.iter().enumerate() {
        let exponent = x.pow((m - j) as u64);
        rhs2 = rhs2.multiply(&c_b_j.exponentiate(&exponent)?)?;
    }
    rhs2 = rhs2.multiply(&argument.c_bm)?;
    if lhs2 != rhs2 {
        tracing::warn!(target: LOG_TARGET, "zero argument rejected: check 2 failed");
        return Ok(VerificationResult::failed("zero argument check 2 failed"));
    }

    // Check 3: com(a' star_y b'; t') == prod_{k=0}^{2m} c_d[k]^{x^k}
    let a_prime_vec: Vec<ZqElement> = argument.a_prime.iter().cloned().collect();
    let b_prime_vec: Vec<ZqElement> = argument.b_prime.iter().cloned().collect();
    let dot = bilinear_y(&a_prime_vec, &b_prime_vec, statement.y())?;
    let lhs3 = get_commitment(&GroupVector::new(vec![dot])?, &argument.t_prime, ck)?;
    let mut rhs3 = GqElement::identity(ck.group().clone());
    let mut x_power = ZqElement::one(zq.clone());
    for c_d_k in argument.c_d.iter() {
        rhs3 = rhs3.multiply(&c_d_k.exponentiate(&x_power)?)?;
        x_power = x_power.multiply(&x)?;
    }
    if lhs3 != rhs3 {
        tracing::warn!(target: LOG_TARGET, "zero argument rejected: check 3 failed");
        return Ok(VerificationResult::failed("zero argument check 3 failed"));
    }

    Ok(VerificationResult::Verified)
}
