//! Single Value Product Argument (SVPA): proves a committed vector `a` has
//! product equal to a committed scalar `b`, i.e. `∏_i a_i = b`.
//!
//! `ProductArg` reduces an m-column matrix to this base case (`m == 1`), and
//! also invokes it on the row-products vector it builds for `m >= 2`.

use std::sync::Arc;

use rand::RngCore;

use crate::commitment::{get_commitment, CommitmentKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::params::ZqGroup;
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};
use crate::zkp::VerificationResult;

const LOG_TARGET: &str = "bgshuffle::zkp::single_value_product_argument";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleValueProductStatement {
    c_a: GqElement,
    b: ZqElement,
}

impl SingleValueProductStatement {
    pub fn new(c_a: GqElement, b: ZqElement) -> CryptoResult<Self> {
        if c_a.group().q() != b.group_arc().q() {
            return Err(CryptoError::group_mismatch(c_a.group().q().to_string(), b.group_arc().q().to_string()));
        }
        Ok(SingleValueProductStatement { c_a, b })
    }

    pub fn c_a(&self) -> &GqElement {
        &self.c_a
    }

    pub fn b(&self) -> &ZqElement {
        &self.b
    }

    fn to_hashable(&self) -> Hashable {
        Hashable::list([Hashable::from(&self.c_a), Hashable::from(&self.b)])
    }
}

#[derive(Clone, Debug)]
pub struct SingleValueProductWitness {
    a: GroupVector<ZqElement>,
    r: ZqElement,
}

impl SingleValueProductWitness {
    pub fn new(a: GroupVector<ZqElement>, r: ZqElement) -> CryptoResult<Self> {
        if a.len() < 2 {
            return Err(CryptoError::invalid("SingleValueProductWitness requires a vector of length >= 2"));
        }
        if a.group() != r.group_arc() {
            return Err(CryptoError::group_mismatch(a.group().to_string(), r.group_arc().to_string()));
        }
        Ok(SingleValueProductWitness { a, r })
    }

    pub fn n(&self) -> usize {
        self.a.len()
    }
}

/// `b_0 = a_0`, `b_i = a_i · b_{i-1}` for `i = 1..n`: the running partial
/// products, whose final entry is the claimed product.
fn partial_products(a: &[ZqElement]) -> CryptoResult<Vec<ZqElement>> {
    let mut out = Vec::with_capacity(a.len());
    out.push(a[0].clone());
    for i in 1..a.len() {
        let prev = out[i - 1].clone();
        out.push(a[i].multiply(&prev)?);
    }
    Ok(out)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleValueProductArgument {
    c_d: GqElement,
    c_lower_delta: GqElement,
    c_upper_delta: GqElement,
    a_tilde: GroupVector<ZqElement>,
    b_tilde: GroupVector<ZqElement>,
    r_tilde: ZqElement,
    s_tilde: ZqElement,
}

impl SingleValueProductArgument {
    pub fn c_d(&self) -> &GqElement {
        &self.c_d
    }
    pub fn c_lower_delta(&self) -> &GqElement {
        &self.c_lower_delta
    }
    pub fn c_upper_delta(&self) -> &GqElement {
        &self.c_upper_delta
    }
}

pub fn prove<R: RngCore>(
    statement: &SingleValueProductStatement,
    witness: &SingleValueProductWitness,
    ck: &CommitmentKey,
    rng: &mut R,
) -> CryptoResult<SingleValueProductArgument> {
    let n = witness.n();
    tracing::debug!(target: LOG_TARGET, n, "proving single value product argument");
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());
    let a: Vec<ZqElement> = witness.a.iter().cloned().collect();
    let b_seq = partial_products(&a)?;

    let d: Vec<ZqElement> = (0..n).map(|_| ZqElement::random(rng, zq.clone())).collect();
    let r_d = ZqElement::random(rng, zq.clone());

    // delta_0 = d_0; delta_i = a_i * delta_{i-1} + d_i * b_{i-1}, chaining
    // the masked recurrence that the verifier will later unwind via x.
    let mut delta = Vec::with_capacity(n);
    delta.push(d[0].clone());
    for i in 1..n {
        let term1 = a[i].multiply(&delta[i - 1])?;
        let term2 = d[i].multiply(&b_seq[i - 1])?;
        delta.push(term1.add(&term2)?);
    }

    // Δ_j = -(delta_j * d_{j+1}), j = 0..n-2: the cross term each step's
    // masked product leaves behind once the recurrence is substituted in.
    let mut cross = Vec::with_capacity(n - 1);
    for j in 0..n - 1 {
        let term = delta[j].multiply(&d[j + 1])?;
        cross.push(term.negate());
    }

    let s_lower = ZqElement::random(rng, zq.clone());
    let s_upper = ZqElement::random(rng, zq.clone());

    let c_d = get_commitment(&GroupVector::new(d.clone())?, &r_d, ck)?;
    let c_lower_delta = get_commitment(&GroupVector::new(cross)?, &s_lower, ck)?;
    let c_upper_delta = get_commitment(&GroupVector::new(delta[1..].to_vec())?, &s_upper, ck)?;

    let transcript = vec![
        statement.to_hashable(),
        Hashable::from(&c_d),
        Hashable::from(&c_lower_delta),
        Hashable::from(&c_upper_delta),
    ];
    let hasher = HashTranscript::new(&zq);
    let x = hasher.challenge(&transcript, zq.clone())?;

    let a_tilde: Vec<ZqElement> = a.iter().zip(d.iter()).map(|(ai, di)| ai.multiply(&x).and_then(|v| v.add(di))).collect::<CryptoResult<Vec<_>>>()?;
    let b_tilde: Vec<ZqElement> = b_seq
        .iter()
        .zip(delta.iter())
        .map(|(bi, di)| bi.multiply(&x).and_then(|v| v.add(di)))
        .collect::<CryptoResult<Vec<_>>>()?;
    let r_tilde = witness.r.multiply(&x)?.add(&r_d)?;
    let s_tilde = s_upper.multiply(&x)?.add(&s_lower)?;

    Ok(SingleValueProductArgument {
        c_d,
        c_lower_delta,
        c_upper_delta,
        a_tilde: GroupVector::new(a_tilde)?,
        b_tilde: GroupVector::new(b_tilde)?,
        r_tilde,
        s_tilde,
    })
}

pub fn verify(
    statement: &SingleValueProductStatement,
    argument: &SingleValueProductArgument,
    ck: &CommitmentKey,
) -> CryptoResult<VerificationResult> {
    let n = argument.a_tilde.len();
    tracing::debug!(target: LOG_TARGET, n, "verifying single value product argument");
    if n < 2 {
        tracing::warn!(target: LOG_TARGET, "single value product argument rejected: a_tilde too short");
        return Ok(VerificationResult::failed("a_tilde too short for a single value product argument"));
    }
    if argument.b_tilde.len() != n {
        tracing::warn!(target: LOG_TARGET, "single value product argument rejected: a_tilde and b_tilde lengths differ");
        return Ok(VerificationResult::failed("a_tilde and b_tilde lengths differ"));
    }
    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());

    let transcript = vec![
        statement.to_hashable(),
        Hashable::from(&argument.c_d),
        Hashable::from(&argument.c_lower_delta),
        Hashable::from(&argument.c_upper_delta),
    ];
    let hasher = HashTranscript::new(&zq);
    let x = hasher.challenge(&transcript, zq.clone())?;

    // Check 1: com(a~; r~) == c_a^x * c_d
    let lhs1 = get_commitment(&argument.a_tilde, &argument.r_tilde, ck)?;
    let rhs1 = statement.c_a().exponentiate(&x)?.multiply(&argument.c_d)?;
    if lhs1 != rhs1 {
        tracing::warn!(target: LOG_TARGET, "single value product argument rejected: check 1 failed");
        return Ok(VerificationResult::failed("single value product argument check 1 failed"));
    }

    // Check 2: com(b~_0..b~_{n-2}; s~) == c_upper_delta^x * c_lower_delta
    let b_tilde_head: Vec<ZqElement> = argument.b_tilde.iter().take(n - 1).cloned().collect();
    let lhs2 = get_commitment(&GroupVector::new(b_tilde_head)?, &argument.s_tilde, ck)?;
    let rhs2 = argument.c_upper_delta.exponentiate(&x)?.multiply(&argument.c_lower_delta)?;
    if lhs2 != rhs2 {
        tracing::warn!(target: LOG_TARGET, "single value product argument rejected: check 2 failed");
        return Ok(VerificationResult::failed("single value product argument check 2 failed"));
    }

    // Check 3: the last entry of b~ closes the chain against the public
    // product: b~_{n-1} == x * b.
    let lhs3 = argument.b_tilde.get(n - 1).expect("length checked above");
    let rhs3 = statement.b().multiply(&x)?;
    if *lhs3 != rhs3 {
        tracing::warn!(target: LOG_TARGET, "single value product argument rejected: check 3 failed");
        return Ok(VerificationResult::failed("single value product argument check 3 failed"));
    }

    Ok(VerificationResult::Verified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::CommitmentKey;
    use crate::group::element::GqElement;
    use crate::group::params::GqGroup;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn group() -> Arc<GqGroup> {
        Arc::new(GqGroup::new(BigUint::from(23u32), BigUint::from(11u32), BigUint::from(6u32)).unwrap())
    }

    fn gq(v: u64, g: &Arc<GqGroup>) -> GqElement {
        GqElement::new(BigUint::from(v), g.clone()).unwrap()
    }

    fn ck_2(g: &Arc<GqGroup>) -> CommitmentKey {
        CommitmentKey::new(gq(2, g), vec![gq(3, g), gq(4, g)]).unwrap()
    }

    #[test]
    fn pinned_test_vector_matches_hand_computed_values() {
        // group(23,11,6), a=(2,10), r=5, ck=(h=2; g1=3,g2=4), product b=9,
        // mocked randomness d=(3,7), r_d=10, s_lower=4, s_upper=8.
        let g = group();
        let zq = Arc::new(g.exponent_group());
        let ck = ck_2(&g);

        let a = GroupVector::new(vec![ZqElement::from_u64(2, zq.clone()), ZqElement::from_u64(10, zq.clone())]).unwrap();
        let r = ZqElement::from_u64(5, zq.clone());
        let witness = SingleValueProductWitness::new(a.clone(), r.clone()).unwrap();

        let c_a = get_commitment(&a, &r, &ck).unwrap();
        assert_eq!(c_a.value(), &BigUint::from(3u32));
        let b = ZqElement::from_u64(9, zq.clone());
        let statement = SingleValueProductStatement::new(c_a, b).unwrap();

        // Re-derive the argument by hand using the same mocked randomness
        // the scenario pins, bypassing `prove`'s RNG draws.
        let d = vec![ZqElement::from_u64(3, zq.clone()), ZqElement::from_u64(7, zq.clone())];
        let r_d = ZqElement::from_u64(10, zq.clone());
        let s_lower = ZqElement::from_u64(4, zq.clone());
        let s_upper = ZqElement::from_u64(8, zq.clone());

        let a_vec: Vec<ZqElement> = a.iter().cloned().collect();
        let b_seq = partial_products(&a_vec).unwrap();
        let mut delta = vec![d[0].clone()];
        for i in 1..2 {
            let term1 = a_vec[i].multiply(&delta[i - 1]).unwrap();
            let term2 = d[i].multiply(&b_seq[i - 1]).unwrap();
            delta.push(term1.add(&term2).unwrap());
        }
        assert_eq!(delta[0].value(), &BigUint::from(3u32));
        assert_eq!(delta[1].value(), &BigUint::from(0u32));

        let cross = vec![delta[0].multiply(&d[1]).unwrap().negate()];
        let c_d = get_commitment(&GroupVector::new(d.clone()).unwrap(), &r_d, &ck).unwrap();
        let c_lower_delta = get_commitment(&GroupVector::new(cross).unwrap(), &s_lower, &ck).unwrap();
        let c_upper_delta = get_commitment(&GroupVector::new(delta[1..].to_vec()).unwrap(), &s_upper, &ck).unwrap();
        assert_eq!(c_d.value(), &BigUint::from(16u32));
        assert_eq!(c_lower_delta.value(), &BigUint::from(2u32));
        assert_eq!(c_upper_delta.value(), &BigUint::from(3u32));

        let x = ZqElement::from_u64(10, zq.clone());
        let a_tilde = vec![a_vec[0].multiply(&x).unwrap().add(&d[0]).unwrap(), a_vec[1].multiply(&x).unwrap().add(&d[1]).unwrap()];
        assert_eq!(a_tilde[0].value(), &BigUint::from(1u32));
        assert_eq!(a_tilde[1].value(), &BigUint::from(8u32));
        let b_tilde = vec![
            b_seq[0].multiply(&x).unwrap().add(&delta[0]).unwrap(),
            b_seq[1].multiply(&x).unwrap().add(&delta[1]).unwrap(),
        ];
        assert_eq!(b_tilde[0].value(), &BigUint::from(1u32));
        assert_eq!(b_tilde[1].value(), &BigUint::from(2u32));
        let r_tilde = r.multiply(&x).unwrap().add(&r_d).unwrap();
        assert_eq!(r_tilde.value(), &BigUint::from(5u32));
        let s_tilde = s_upper.multiply(&x).unwrap().add(&s_lower).unwrap();
        assert_eq!(s_tilde.value(), &BigUint::from(7u32));

        let argument = SingleValueProductArgument {
            c_d,
            c_lower_delta,
            c_upper_delta,
            a_tilde: GroupVector::new(a_tilde).unwrap(),
            b_tilde: GroupVector::new(b_tilde).unwrap(),
            r_tilde,
            s_tilde,
        };
        let result = verify(&statement, &argument, &ck).unwrap();
        assert_eq!(result, VerificationResult::Verified);
    }

    #[test]
    fn honest_round_trip_with_random_witness_verifies() {
        let g = group();
        let zq = Arc::new(g.exponent_group());
        let ck = ck_2(&g);
        let mut rng = ChaCha20Rng::seed_from_u64(99);

        let a = GroupVector::new(vec![ZqElement::from_u64(3, zq.clone()), ZqElement::from_u64(5, zq.clone())]).unwrap();
        let r = ZqElement::from_u64(2, zq.clone());
        let witness = SingleValueProductWitness::new(a.clone(), r.clone()).unwrap();
        let c_a = get_commitment(&a, &r, &ck).unwrap();
        let product = ZqElement::from_u64(3, zq.clone()).multiply(&ZqElement::from_u64(5, zq.clone())).unwrap();
        let statement = SingleValueProductStatement::new(c_a, product).unwrap();

        let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
        let result = verify(&statement, &argument, &ck).unwrap();
        assert_eq!(result, VerificationResult::Verified);
    }

    #[test]
    fn tampered_product_is_rejected() {
        let g = group();
        let zq = Arc::new(g.exponent_group());
        let ck = ck_2(&g);
        let mut rng = ChaCha20Rng::seed_from_u64(100);

        let a = GroupVector::new(vec![ZqElement::from_u64(3, zq.clone()), ZqElement::from_u64(5, zq.clone())]).unwrap();
        let r = ZqElement::from_u64(2, zq.clone());
        let witness = SingleValueProductWitness::new(a.clone(), r.clone()).unwrap();
        let c_a = get_commitment(&a, &r, &ck).unwrap();
        let wrong_product = ZqElement::from_u64(7, zq.clone());
        let statement = SingleValueProductStatement::new(c_a, wrong_product).unwrap();

        let argument = prove(&statement, &witness, &ck, &mut rng);
        // Proving itself doesn't re-check b; the mismatch surfaces at
        // verification.
        let argument = argument.unwrap();
        let result = verify(&statement, &argument, &ck).unwrap();
        assert!(!result.is_verified());
    }

    #[test]
    fn witness_shorter_than_two_is_rejected() {
        let g = group();
        let zq = Arc::new(g.exponent_group());
        let a = GroupVector::new(vec![ZqElement::from_u64(3, zq.clone())]).unwrap();
        let r = ZqElement::from_u64(2, zq);
        assert!(SingleValueProductWitness::new(a, r).is_err());
    }
}
