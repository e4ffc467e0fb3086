//! Hadamard Argument: proves a committed vector `b` equals the entrywise
//! (Hadamard) product of the columns of committed matrix `A`,
//! `b_j = ∏_i A_{j,i}`, by reducing to one `ZeroArg` instance.

use std::sync::Arc;

use rand::RngCore;

use num_bigint::BigInt;

use crate::commitment::{get_commitment, get_commitment_matrix, CommitmentKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::matrix::GroupMatrix;
use crate::group::params::ZqGroup;
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};
use crate::zkp::zero_argument::{self, add_vectors, scale_vector, ZeroArgument, ZeroStatement, ZeroWitness};
use crate::zkp::VerificationResult;

const LOG_TARGET: &str = "bgshuffle::zkp::hadamard_argument";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HadamardStatement {
    c_a: GroupVector<GqElement>,
    c_b: GqElement,
    /// Row count of the committed matrices. Needed by the verifier to
    /// rebuild the all-(-1) commitment used in the recurrence's Zero
    /// Argument instance, since that vector's length isn't otherwise
    /// recoverable from a `GqElement` commitment.
    n: usize,
}

impl HadamardStatement {
    pub fn new(c_a: GroupVector<GqElement>, c_b: GqElement, n: usize) -> Self {
        HadamardStatement { c_a, c_b, n }
    }

    pub fn m(&self) -> usize {
        self.c_a.len()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn c_a(&self) -> &GroupVector<GqElement> {
        &self.c_a
    }

    pub fn c_b(&self) -> &GqElement {
        &self.c_b
    }

    fn to_hashable(&self) -> Hashable {
        Hashable::list([
            Hashable::list(self.c_a.iter().map(Hashable::from)),
            Hashable::from(&self.c_b),
            Hashable::Integer(BigInt::from(self.n as u64)),
        ])
    }
}

#[derive(Clone, Debug)]
pub struct HadamardWitness {
    a: GroupMatrix<ZqElement>,
    b: GroupVector<ZqElement>,
    r: GroupVector<ZqElement>,
    s: ZqElement,
}

impl HadamardWitness {
    pub fn new(
        a: GroupMatrix<ZqElement>,
        b: GroupVector<ZqElement>,
        r: GroupVector<ZqElement>,
        s: ZqElement,
    ) -> CryptoResult<Self> {
        if b.len() != a.num_rows() {
            return Err(CryptoError::invalid("HadamardWitness requires b's length to equal A's row count"));
        }
        if r.len() != a.num_columns() {
            return Err(CryptoError::invalid("HadamardWitness requires r's length to equal A's column count"));
        }
        Ok(HadamardWitness { a, b, r, s })
    }

    pub fn n(&self) -> usize {
        self.a.num_rows()
    }

    pub fn m(&self) -> usize {
        self.a.num_columns()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HadamardArgument {
    c_b_intermediate: GroupVector<GqElement>,
    zero_argument: ZeroArgument,
}

impl HadamardArgument {
    pub fn c_b_intermediate(&self) -> &GroupVector<GqElement> {
        &self.c_b_intermediate
    }

    pub fn zero_argument(&self) -> &ZeroArgument {
        &self.zero_argument
    }
}

fn entrywise_product(a: &[ZqElement], b: &[ZqElement]) -> CryptoResult<Vec<ZqElement>> {
    a.iter().zip(b.iter()).map(|(x, y)| x.multiply(y)).collect()
}

/// A zero-witness/statement pair that trivially certifies `0 star_y 0 = 0`.
/// Used for `m == 1`, where there is no `B_{k-1} -> B_k` recurrence to
/// prove (the single intermediate commitment equals both `c_A`'s only
/// column and `c_b` by construction, checked directly rather than through
/// a zero argument). A commitment to an all-zero vector is `h^0 · ∏ g_i^0`,
/// the identity, independent of the vector's length, so a length-1 zero
/// column is as good as any other for this purpose.
fn vacuous_zero_instance(zq: &Arc<ZqGroup>, ck: &CommitmentKey, y: ZqElement) -> CryptoResult<(ZeroStatement, ZeroWitness)> {
    let zero_col = vec![ZqElement::zero(zq.clone())];
    let a = GroupMatrix::from_columns(vec![zero_col.clone()])?;
    let b = GroupMatrix::from_columns(vec![zero_col])?;
    let r = GroupVector::new(vec![ZqElement::zero(zq.clone())])?;
    let s = GroupVector::new(vec![ZqElement::zero(zq.clone())])?;
    let c_a = get_commitment_matrix(&a, &r, ck)?;
    let c_b = get_commitment_matrix(&b, &s, ck)?;
    let witness = ZeroWitness::new(a, b, r, s)?;
    let statement = ZeroStatement::new(c_a, c_b, y)?;
    Ok((statement, witness))
}

pub fn prove<R: RngCore>(
    statement: &HadamardStatement,
    witness: &HadamardWitness,
    ck: &CommitmentKey,
    rng: &mut R,
) -> CryptoResult<HadamardArgument> {
    let m = statement.m();
    if witness.m() != m {
        return Err(CryptoError::invalid("witness column count does not match statement length"));
    }
    tracing::debug!(target: LOG_TARGET, m, n = witness.n(), "proving hadamard argument");
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());

    // B_0 = A's first column, B_k = B_{k-1} (hadamard) A's (k+1)-th column.
    let columns: Vec<Vec<ZqElement>> = witness.a.columns().map(|c| c.into_iter().cloned().collect()).collect();
    let mut intermediate_columns = Vec::with_capacity(m);
    intermediate_columns.push(columns[0].clone());
    for k in 1..m {
        let prev = &intermediate_columns[k - 1];
        intermediate_columns.push(entrywise_product(prev, &columns[k])?);
    }

    // Randomness for the intermediate commitments: s_0 = r_0 (so
    // c_B[0] == c_A's first column), s_{m-1} = witness.s (so
    // c_B[m-1] == c_b), the rest freshly random.
    let mut s_intermediate = Vec::with_capacity(m);
    for k in 0..m {
        if k == 0 {
            s_intermediate.push(witness.r.get(0).cloned().ok_or_else(|| CryptoError::invalid("witness.r is empty"))?);
        } else if k == m - 1 {
            s_intermediate.push(witness.s.clone());
        } else {
            s_intermediate.push(ZqElement::random(rng, zq.clone()));
        }
    }

    let c_b_matrix = GroupMatrix::from_columns(intermediate_columns.clone())?;
    let s_vector = GroupVector::new(s_intermediate.clone())?;
    let c_b_intermediate = get_commitment_matrix(&c_b_matrix, &s_vector, ck)?;

    let mut transcript = vec![statement.to_hashable()];
    transcript.push(Hashable::list(c_b_intermediate.iter().map(Hashable::from)));
    let hasher = HashTranscript::new(&zq);
    let y = hasher.challenge(&transcript, zq.clone())?;
    let x = hasher.challenge(&[Hashable::from(&y)], zq.clone())?;

    if m == 1 {
        let (zero_statement, zero_witness) = vacuous_zero_instance(&zq, ck, y)?;
        let zero_argument = zero_argument::prove(&zero_statement, &zero_witness, ck, rng)?;
        return Ok(HadamardArgument { c_b_intermediate, zero_argument });
    }

    // The recurrence B_k = A_{k+1} hadamard B_{k-1} (k = 1..m-1) is batched
    // into one ZeroArg instance over m columns via the D-vector construction:
    // A'_k = A_{k+1} for k = 1..m-1, A'_m = the all-(-1) vector; B'_k =
    // x^k B_{k-1} for k = 1..m-1, B'_m = sum_{k=1}^{m-1} x^k B_k. Then
    // sum_k A'_k star_y B'_k = sum_{k=1}^{m-1} x^k sum_j y^j (A_{k+1,j}
    // B_{k-1,j} - B_{k,j}), which is zero for every (k, j) iff the
    // recurrence holds, and nonzero with overwhelming probability over
    // (x, y) otherwise (Schwartz-Zippel on a bivariate polynomial).
    let n = witness.n();
    let minus_one = ZqElement::one(zq.clone()).negate();
    let minus_ones_col = vec![minus_one; n];
    let minus_ones_r = ZqElement::zero(zq.clone());

    let mut a_prime_cols: Vec<Vec<ZqElement>> = columns[1..].to_vec();
    a_prime_cols.push(minus_ones_col);
    let mut r_prime: Vec<ZqElement> = witness.r.iter().skip(1).cloned().collect();
    r_prime.push(minus_ones_r);

    let mut b_prime_cols: Vec<Vec<ZqElement>> = Vec::with_capacity(m);
    let mut s_prime: Vec<ZqElement> = Vec::with_capacity(m);
    let mut combined_b = vec![ZqElement::zero(zq.clone()); n];
    let mut combined_s = ZqElement::zero(zq.clone());
    let mut x_power = x.clone();
    for k in 1..m {
        b_prime_cols.push(scale_vector(&intermediate_columns[k - 1], &x_power)?);
        s_prime.push(s_intermediate[k - 1].multiply(&x_power)?);

        combined_b = add_vectors(&combined_b, &scale_vector(&intermediate_columns[k], &x_power)?)?;
        combined_s = combined_s.add(&s_intermediate[k].multiply(&x_power)?)?;

        x_power = x_power.multiply(&x)?;
    }
    b_prime_cols.push(combined_b);
    s_prime.push(combined_s);

    let recurrence_a = GroupMatrix::from_columns(a_prime_cols)?;
    let recurrence_b = GroupMatrix::from_columns(b_prime_cols)?;
    let recurrence_r = GroupVector::new(r_prime)?;
    let recurrence_s = GroupVector::new(s_prime)?;

    let c_a_prime = get_commitment_matrix(&recurrence_a, &recurrence_r, ck)?;
    let c_b_prime = get_commitment_matrix(&recurrence_b, &recurrence_s, ck)?;
    let zero_statement = ZeroStatement::new(c_a_prime, c_b_prime, y)?;

    let zero_witness = ZeroWitness::new(recurrence_a, recurrence_b, recurrence_r, recurrence_s)?;

    let zero_argument = zero_argument::prove(&zero_statement, &zero_witness, ck, rng)?;

    Ok(HadamardArgument { c_b_intermediate, zero_argument })
}

pub fn verify(
    statement: &HadamardStatement,
    argument: &HadamardArgument,
    ck: &CommitmentKey,
) -> CryptoResult<VerificationResult> {
    let m = statement.m();
    tracing::debug!(target: LOG_TARGET, m, "verifying hadamard argument");
    if argument.c_b_intermediate.len() != m {
        tracing::warn!(target: LOG_TARGET, "hadamard argument rejected: intermediate commitment vector has the wrong length");
        return Ok(VerificationResult::failed("intermediate commitment vector has the wrong length"));
    }
    let last = argument.c_b_intermediate.get(m - 1).expect("length checked above");
    if last != statement.c_b() {
        tracing::warn!(target: LOG_TARGET, "hadamard argument rejected: last intermediate commitment does not match c_b");
        return Ok(VerificationResult::failed("last intermediate commitment does not match c_b"));
    }
    if argument.c_b_intermediate.get(0).expect("m >= 1") != statement.c_a().get(0).expect("m >= 1") {
        tracing::warn!(target: LOG_TARGET, "hadamard argument rejected: first intermediate commitment does not match c_A's first column");
        return Ok(VerificationResult::failed("first intermediate commitment does not match c_A's first column"));
    }

    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());
    let mut transcript = vec![statement.to_hashable()];
    transcript.push(Hashable::list(argument.c_b_intermediate.iter().map(Hashable::from)));
    let hasher = HashTranscript::new(&zq);
    let y = hasher.challenge(&transcript, zq.clone())?;
    let x = hasher.challenge(&[Hashable::from(&y)], zq.clone())?;

    if m == 1 {
        // Already checked above that c_b_intermediate[0] equals both
        // statement.c_a()[0] and statement.c_b(); the recurrence is
        // vacuous, so only the inner zero argument's own well-formedness
        // against this fixed, publicly reconstructible instance matters.
        let (zero_statement, _witness) = vacuous_zero_instance(&zq, ck, y)?;
        return zero_argument::verify(&zero_statement, &argument.zero_argument, ck);
    }

    let n = statement.n();
    let minus_one = ZqElement::one(zq.clone()).negate();
    let minus_ones_vector = GroupVector::new(vec![minus_one; n])?;
    let minus_ones_commit = get_commitment(&minus_ones_vector, &ZqElement::zero(zq.clone()), ck)?;

    let mut c_a_prime: Vec<GqElement> = statement.c_a().iter().skip(1).cloned().collect();
    c_a_prime.push(minus_ones_commit);

    let mut c_b_prime: Vec<GqElement> = Vec::with_capacity(m);
    let mut combined = GqElement::identity(ck.group().clone());
    let mut x_power = x.clone();
    for k in 1..m {
        let b_k_minus_1 = argument.c_b_intermediate.get(k - 1).expect("k - 1 < m");
        c_b_prime.push(b_k_minus_1.exponentiate(&x_power)?);

        let b_k = argument.c_b_intermediate.get(k).expect("k < m");
        combined = combined.multiply(&b_k.exponentiate(&x_power)?)?;

        x_power = x_power.multiply(&x)?;
    }
    c_b_prime.push(combined);

    let zero_statement = ZeroStatement::new(GroupVector::new(c_a_prime)?, GroupVector::new(c_b_prime)?, y)?;
    zero_argument::verify(&zero_statement, &argument.zero_argument, ck)
}
