//! Shuffle Argument: the outer Bayer-Groth argument. Proves that a public
//! ciphertext vector `C'` is a permutation-and-rerandomization of another
//! public vector `C` (produced by [`crate::shuffle_op`]), without revealing
//! either the permutation or the rerandomization factors.
//!
//! Both public vectors are reshaped into `m × n` matrices (chosen by
//! [`crate::matrix_utils::matrix_dimensions`]). The permutation is encoded
//! as an exponent matrix `A` built from Fiat-Shamir challenge powers
//! `x_1, …, x_N`, committed column by column as `c_A`. Two sub-arguments
//! then close the proof: `ProductArg` shows `A`'s entries, shifted by a
//! second challenge `z`, multiply out to the same total as `{x_k - z}`
//! would for *any* permutation of the `x_k` — binding `A` to a permutation
//! of the challenges without fixing which one. `MultiExpArg` shows the
//! ciphertext algebra actually closes under that same `A`, linking the
//! permutation back to the public ciphertexts.

use std::sync::Arc;

use rand::RngCore;

use crate::commitment::{get_commitment, get_commitment_matrix, CommitmentKey};
use crate::elgamal::{Ciphertext, PublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::matrix::GroupMatrix;
use crate::group::params::{GqGroup, ZqGroup};
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};
use crate::matrix_utils::matrix_dimensions;
use crate::shuffle_op::Permutation;
use crate::zkp::multi_exponentiation_argument::{
    self, MultiExponentiationArgument, MultiExponentiationStatement, MultiExponentiationWitness,
};
use crate::zkp::product_argument::{self, ProductArgument, ProductStatement, ProductWitness};
use crate::zkp::VerificationResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleStatement {
    ciphertexts: Vec<Ciphertext>,
    shuffled: Vec<Ciphertext>,
    pk: PublicKey,
    generator: GqElement,
}

impl ShuffleStatement {
    pub fn new(
        ciphertexts: Vec<Ciphertext>,
        shuffled: Vec<Ciphertext>,
        pk: PublicKey,
        generator: GqElement,
    ) -> CryptoResult<Self> {
        if ciphertexts.is_empty() {
            return Err(CryptoError::invalid("shuffle statement requires at least one ciphertext"));
        }
        if ciphertexts.len() != shuffled.len() {
            return Err(CryptoError::invalid("same size"));
        }
        let width = ciphertexts[0].width();
        for c in ciphertexts.iter().chain(shuffled.iter()) {
            if c.group() != generator.group_arc() {
                return Err(CryptoError::group_mismatch(generator.group_arc().to_string(), c.group().to_string()));
            }
            if c.width() != width {
                return Err(CryptoError::invalid("all ciphertexts in a shuffle must share one width"));
            }
        }
        if pk.len() != width {
            return Err(CryptoError::invalid("public key width must match ciphertext width"));
        }
        Ok(ShuffleStatement { ciphertexts, shuffled, pk, generator })
    }

    pub fn n_total(&self) -> usize {
        self.ciphertexts.len()
    }

    pub fn ciphertexts(&self) -> &[Ciphertext] {
        &self.ciphertexts
    }

    pub fn shuffled(&self) -> &[Ciphertext] {
        &self.shuffled
    }

    pub fn pk(&self) -> &PublicKey {
        &self.pk
    }

    pub fn generator(&self) -> &GqElement {
        &self.generator
    }

    fn group(&self) -> Arc<GqGroup> {
        self.generator.group_arc().clone()
    }

    fn to_hashable(&self) -> Hashable {
        let flatten = |cs: &[Ciphertext]| {
            Hashable::list(cs.iter().flat_map(|c| std::iter::once(Hashable::from(c.gamma())).chain(c.phis().iter().map(Hashable::from))))
        };
        Hashable::list([flatten(&self.ciphertexts), flatten(&self.shuffled)])
    }
}

/// `(π, ρ)`: the permutation and rerandomization factors [`crate::shuffle_op`]
/// used to derive `statement.shuffled()` from `statement.ciphertexts()`.
/// `ρ[j]` is the randomness used to rerandomize the ciphertext originally at
/// index `j` (matching [`crate::shuffle_op::apply`]'s convention).
#[derive(Clone, Debug)]
pub struct ShuffleWitness {
    permutation: Permutation,
    randomness: Vec<ZqElement>,
}

impl ShuffleWitness {
    pub fn new(permutation: Permutation, randomness: Vec<ZqElement>) -> CryptoResult<Self> {
        if permutation.len() != randomness.len() {
            return Err(CryptoError::invalid("shuffle witness permutation and randomness must have equal length"));
        }
        Ok(ShuffleWitness { permutation, randomness })
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn randomness(&self) -> &[ZqElement] {
        &self.randomness
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleArgument {
    c_a: GroupVector<GqElement>,
    product_argument: ProductArgument,
    multi_exponentiation_argument: MultiExponentiationArgument,
}

impl ShuffleArgument {
    pub fn c_a(&self) -> &GroupVector<GqElement> {
        &self.c_a
    }

    pub fn product_argument(&self) -> &ProductArgument {
        &self.product_argument
    }

    pub fn multi_exponentiation_argument(&self) -> &MultiExponentiationArgument {
        &self.multi_exponentiation_argument
    }
}

/// `x_1, …, x_N`, `x_i = x_seed^i`.
fn challenge_powers(x_seed: &ZqElement, n_total: usize) -> CryptoResult<Vec<ZqElement>> {
    let mut powers = Vec::with_capacity(n_total);
    let mut acc = x_seed.clone();
    for _ in 0..n_total {
        powers.push(acc.clone());
        acc = acc.multiply(x_seed)?;
    }
    Ok(powers)
}

/// Reshapes a length-N flat slice into `m` rows of `n` elements,
/// `flat[i * n + j]` becoming `rows[i][j]`; the same row-major convention
/// `GroupMatrix::from_rows` uses elsewhere in this crate.
fn reshape_rows<T: Clone>(flat: &[T], m: usize, n: usize) -> Vec<Vec<T>> {
    (0..m).map(|i| flat[i * n..(i + 1) * n].to_vec()).collect()
}

/// The x-challenge is derived first, from the statement alone (there is no
/// prover message to bind it to yet).
fn derive_x_seed(statement: &ShuffleStatement, zq: &Arc<ZqGroup>) -> CryptoResult<ZqElement> {
    let transcript = vec![Hashable::from_str("shuffle-x"), statement.to_hashable()];
    HashTranscript::new(zq).challenge(&transcript, zq.clone())
}

/// The z-challenge is derived after `c_A` is fixed, binding it into the
/// transcript.
fn derive_z(statement: &ShuffleStatement, c_a: &GroupVector<GqElement>, zq: &Arc<ZqGroup>) -> CryptoResult<ZqElement> {
    let transcript = vec![
        Hashable::from_str("shuffle-z"),
        statement.to_hashable(),
        Hashable::list(c_a.iter().map(Hashable::from)),
    ];
    HashTranscript::new(zq).challenge(&transcript, zq.clone())
}

/// `com(1, …, 1; 0)` for a width-`n` key: the commitment subtracted (raised
/// to `-z`) from each column of `c_A` to shift the committed matrix by `z`.
fn ones_commitment(n: usize, ck: &CommitmentKey, zq: Arc<ZqGroup>) -> CryptoResult<GqElement> {
    let ones = GroupVector::new(vec![ZqElement::one(zq.clone()); n])?;
    get_commitment(&ones, &ZqElement::zero(zq), ck)
}

pub fn prove<R: RngCore>(
    statement: &ShuffleStatement,
    witness: &ShuffleWitness,
    ck: &CommitmentKey,
    rng: &mut R,
) -> CryptoResult<ShuffleArgument> {
    let n_total = statement.n_total();
    if witness.permutation.len() != n_total {
        return Err(CryptoError::invalid("witness permutation length does not match statement"));
    }
    let group = statement.group();
    let zq: Arc<ZqGroup> = Arc::new(group.exponent_group());
    let (m, n) = matrix_dimensions(n_total)?;
    if ck.k() < n {
        return Err(CryptoError::invalid("commitment key too small for the chosen matrix shape"));
    }

    let x_seed = derive_x_seed(statement, &zq)?;
    let x = challenge_powers(&x_seed, n_total)?;

    // e[j] = x_{π(j)}: the challenge assigned to the new position of the
    // ciphertext originally at j. Reshaped m x n like the ciphertexts, then
    // transposed into A (n x m) to match ProductWitness/MultiExpWitness's
    // exponent-matrix convention.
    let e: Vec<ZqElement> = (0..n_total).map(|j| x[witness.permutation.apply(j)].clone()).collect();
    let e_rows = reshape_rows(&e, m, n);
    let a_rows: Vec<Vec<ZqElement>> = (0..n).map(|j| (0..m).map(|i| e_rows[i][j].clone()).collect()).collect();
    let a_matrix = GroupMatrix::from_rows(a_rows)?;

    let r: Vec<ZqElement> = (0..m).map(|_| ZqElement::random(rng, zq.clone())).collect();
    let r_vector = GroupVector::new(r.clone())?;
    let c_a = get_commitment_matrix(&a_matrix, &r_vector, ck)?;

    let z = derive_z(statement, &c_a, &zq)?;

    // Product argument over the shifted matrix A - z*1: its row products
    // must multiply out to prod_k (x_k - z), which holds for any
    // permutation of the x_k, binding A to being such a permutation.
    let com_one = ones_commitment(n, ck, zq.clone())?;
    let shift = com_one.exponentiate(&z)?.invert();
    let shifted_c_a = GroupVector::new(c_a.iter().map(|c| c.multiply(&shift)).collect::<CryptoResult<Vec<_>>>()?)?;
    let shifted_rows: Vec<Vec<ZqElement>> =
        (0..n).map(|j| (0..m).map(|i| a_matrix.get(j, i).unwrap().subtract(&z)).collect::<CryptoResult<Vec<_>>>()).collect::<CryptoResult<Vec<_>>>()?;
    let shifted_a_matrix = GroupMatrix::from_rows(shifted_rows)?;

    let mut total_product = x[0].subtract(&z)?;
    for x_k in x.iter().skip(1) {
        total_product = total_product.multiply(&x_k.subtract(&z)?)?;
    }

    let product_statement = ProductStatement::new(shifted_c_a, total_product, n);
    let product_witness = ProductWitness::new(shifted_a_matrix, r_vector.clone())?;
    let product_argument = product_argument::prove(&product_statement, &product_witness, ck, rng)?;

    // Multi-exponentiation argument: the ciphertext algebra closes under
    // the same A, tying the permutation back to the actual ciphertexts.
    let c_rows = reshape_rows(statement.ciphertexts(), m, n);
    let c_matrix = GroupMatrix::from_rows(c_rows)?;

    let mut target = statement.shuffled()[0].exponentiate(&x[0])?;
    for (c_k, x_k) in statement.shuffled().iter().zip(x.iter()).skip(1) {
        target = target.multiply(&c_k.exponentiate(x_k)?)?;
    }

    let mut rho = witness.randomness[0].multiply(&e[0])?;
    for (rho_j, e_j) in witness.randomness.iter().zip(e.iter()).skip(1) {
        rho = rho.add(&rho_j.multiply(e_j)?)?;
    }

    let multi_exp_statement =
        MultiExponentiationStatement::new(c_matrix, target, c_a.clone(), statement.pk().clone(), statement.generator().clone())?;
    let multi_exp_witness = MultiExponentiationWitness::new(a_matrix, r_vector, rho)?;
    let multi_exponentiation_argument = multi_exponentiation_argument::prove(&multi_exp_statement, &multi_exp_witness, ck, rng)?;

    Ok(ShuffleArgument { c_a, product_argument, multi_exponentiation_argument })
}

pub fn verify(statement: &ShuffleStatement, argument: &ShuffleArgument, ck: &CommitmentKey) -> CryptoResult<VerificationResult> {
    let n_total = statement.n_total();
    let group = statement.group();
    let zq: Arc<ZqGroup> = Arc::new(group.exponent_group());
    let (m, n) = matrix_dimensions(n_total)?;
    if ck.k() < n {
        return Ok(VerificationResult::failed("commitment key too small for the chosen matrix shape"));
    }
    if argument.c_a.len() != m {
        return Ok(VerificationResult::failed("c_A has the wrong number of columns"));
    }

    let x_seed = derive_x_seed(statement, &zq)?;
    let x = challenge_powers(&x_seed, n_total)?;
    let z = derive_z(statement, &argument.c_a, &zq)?;

    let com_one = ones_commitment(n, ck, zq.clone())?;
    let shift = com_one.exponentiate(&z)?.invert();
    let shifted_c_a = GroupVector::new(argument.c_a.iter().map(|c| c.multiply(&shift)).collect::<CryptoResult<Vec<_>>>()?)?;

    let mut total_product = x[0].subtract(&z)?;
    for x_k in x.iter().skip(1) {
        total_product = total_product.multiply(&x_k.subtract(&z)?)?;
    }

    let product_statement = ProductStatement::new(shifted_c_a, total_product, n);
    let product_result = product_argument::verify(&product_statement, &argument.product_argument, ck)?;
    if !product_result.is_verified() {
        return Ok(VerificationResult::failed(format!("shuffle argument's product check failed: {product_result:?}")));
    }

    let c_rows = reshape_rows(statement.ciphertexts(), m, n);
    let c_matrix = GroupMatrix::from_rows(c_rows)?;

    let mut target = statement.shuffled()[0].exponentiate(&x[0])?;
    for (c_k, x_k) in statement.shuffled().iter().zip(x.iter()).skip(1) {
        target = target.multiply(&c_k.exponentiate(x_k)?)?;
    }

    let multi_exp_statement =
        MultiExponentiationStatement::new(c_matrix, target, argument.c_a.clone(), statement.pk().clone(), statement.generator().clone())?;
    let multi_exp_result = multi_exponentiation_argument::verify(&multi_exp_statement, &argument.multi_exponentiation_argument, ck)?;
    if !multi_exp_result.is_verified() {
        return Ok(VerificationResult::failed(format!("shuffle argument's multi-exponentiation check failed: {multi_exp_result:?}")));
    }

    Ok(VerificationResult::Verified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::get_verifiable_commitment_key;
    use crate::group::params::GqGroup;
    use crate::shuffle_op;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(ck_width: usize) -> (Arc<GqGroup>, Arc<ZqGroup>, CommitmentKey, PublicKey, GqElement) {
        let group = Arc::new(GqGroup::new(BigUint::from(23u32), BigUint::from(11u32), BigUint::from(6u32)).unwrap());
        let zq = Arc::new(group.exponent_group());
        let ck = get_verifiable_commitment_key(ck_width, group.clone()).unwrap();
        let pk = PublicKey::new(vec![GqElement::new(BigUint::from(8u32), group.clone()).unwrap()]).unwrap();
        let generator = GqElement::generator(group.clone());
        (group, zq, ck, pk, generator)
    }

    fn sample_ciphertexts(n: usize, group: &Arc<GqGroup>, zq: &Arc<ZqGroup>, pk: &PublicKey, generator: &GqElement, rng: &mut ChaCha20Rng) -> Vec<Ciphertext> {
        (0..n)
            .map(|i| {
                let message = GqElement::generator(group.clone()).exponentiate(&ZqElement::from_u64((i + 1) as u64, zq.clone())).unwrap();
                let r = ZqElement::random(rng, zq.clone());
                crate::elgamal::encrypt_message(&message, &r, generator, pk).unwrap()
            })
            .collect()
    }

    #[test]
    fn honest_shuffle_of_five_ciphertexts_verifies() {
        // matrix_dimensions(5) == (1, 5): exercises the single-row case.
        let (group, zq, ck, pk, generator) = setup(5);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let ciphertexts = sample_ciphertexts(5, &group, &zq, &pk, &generator, &mut rng);

        let (shuffled, permutation, randomness) = shuffle_op::shuffle(&ciphertexts, &generator, &pk, zq.clone(), &mut rng).unwrap();
        let statement = ShuffleStatement::new(ciphertexts, shuffled, pk, generator).unwrap();
        let witness = ShuffleWitness::new(permutation, randomness).unwrap();

        let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
        let result = verify(&statement, &argument, &ck).unwrap();
        assert_eq!(result, VerificationResult::Verified);
    }

    #[test]
    fn honest_shuffle_of_six_ciphertexts_verifies() {
        // matrix_dimensions(6) == (2, 3): exercises the m >= 2 composed
        // product argument and a non-trivial multi-exponentiation shape.
        let (group, zq, ck, pk, generator) = setup(3);
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let ciphertexts = sample_ciphertexts(6, &group, &zq, &pk, &generator, &mut rng);

        let (shuffled, permutation, randomness) = shuffle_op::shuffle(&ciphertexts, &generator, &pk, zq.clone(), &mut rng).unwrap();
        let statement = ShuffleStatement::new(ciphertexts, shuffled, pk, generator).unwrap();
        let witness = ShuffleWitness::new(permutation, randomness).unwrap();

        let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
        let result = verify(&statement, &argument, &ck).unwrap();
        assert_eq!(result, VerificationResult::Verified);
    }

    #[test]
    fn tampered_shuffled_ciphertext_is_rejected() {
        let (group, zq, ck, pk, generator) = setup(5);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let ciphertexts = sample_ciphertexts(5, &group, &zq, &pk, &generator, &mut rng);
        let (mut shuffled, permutation, randomness) = shuffle_op::shuffle(&ciphertexts, &generator, &pk, zq.clone(), &mut rng).unwrap();

        let witness = ShuffleWitness::new(permutation, randomness).unwrap();
        let honest_statement = ShuffleStatement::new(ciphertexts.clone(), shuffled.clone(), pk.clone(), generator.clone()).unwrap();
        let argument = prove(&honest_statement, &witness, &ck, &mut rng).unwrap();

        // Swap two shuffled ciphertexts after proving: the argument was
        // bound to the original arrangement via Fiat-Shamir.
        shuffled.swap(0, 1);
        let tampered_statement = ShuffleStatement::new(ciphertexts, shuffled, pk, generator).unwrap();
        let result = verify(&tampered_statement, &argument, &ck).unwrap();
        assert!(!result.is_verified());
    }

    #[test]
    fn mismatched_lengths_are_rejected_at_construction() {
        let (group, _zq, _ck, pk, generator) = setup(2);
        let c0 = GqElement::generator(group.clone());
        let ct = Ciphertext::new(c0, vec![GqElement::new(BigUint::from(9u32), group.clone()).unwrap()]).unwrap();
        let err = ShuffleStatement::new(vec![ct.clone(), ct.clone()], vec![ct], pk, generator).unwrap_err();
        assert_eq!(err, CryptoError::invalid("same size"));
    }
}
