//! End-to-end coverage of the public shuffle API: a mix node shuffles a
//! batch with [`shuffle_op::shuffle`], proves it with
//! [`zkp::shuffle_argument::prove`], and an independent verifier checks the
//! result with nothing but the public statement and argument.

use std::sync::Arc;

use bgshuffle::commitment::get_verifiable_commitment_key;
use bgshuffle::elgamal::{encrypt_message, Ciphertext, PublicKey};
use bgshuffle::group::element::{GqElement, ZqElement};
use bgshuffle::group::params::GqGroup;
use bgshuffle::matrix_utils::matrix_dimensions;
use bgshuffle::shuffle_op;
use bgshuffle::zkp::shuffle_argument::{prove, verify, ShuffleStatement, ShuffleWitness};
use bgshuffle::zkp::VerificationResult;
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn small_group() -> Arc<GqGroup> {
    Arc::new(GqGroup::new(BigUint::from(23u32), BigUint::from(11u32), BigUint::from(6u32)).unwrap())
}

fn mix_node_inputs(n: usize, rng: &mut ChaCha20Rng) -> (Vec<Ciphertext>, PublicKey, GqElement) {
    let group = small_group();
    let zq = Arc::new(group.exponent_group());
    let pk = PublicKey::new(vec![GqElement::new(BigUint::from(8u32), group.clone()).unwrap()]).unwrap();
    let generator = GqElement::generator(group.clone());
    let ciphertexts = (0..n)
        .map(|i| {
            let message = generator.exponentiate(&ZqElement::from_u64((i + 1) as u64, zq.clone())).unwrap();
            let r = ZqElement::random(rng, zq.clone());
            encrypt_message(&message, &r, &generator, &pk).unwrap()
        })
        .collect();
    (ciphertexts, pk, generator)
}

#[test]
fn a_shuffled_batch_of_twelve_verifies_end_to_end() {
    let mut rng = ChaCha20Rng::seed_from_u64(2026);
    let (ciphertexts, pk, generator) = mix_node_inputs(12, &mut rng);
    let gq = generator.group_arc().clone();
    let zq = Arc::new(gq.exponent_group());
    let (_, n) = matrix_dimensions(12).unwrap();
    let ck = get_verifiable_commitment_key(n, gq).unwrap();

    let (shuffled, permutation, randomness) = shuffle_op::shuffle(&ciphertexts, &generator, &pk, zq, &mut rng).unwrap();
    let statement = ShuffleStatement::new(ciphertexts, shuffled, pk, generator).unwrap();
    let witness = ShuffleWitness::new(permutation, randomness).unwrap();

    let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
    assert_eq!(verify(&statement, &argument, &ck).unwrap(), VerificationResult::Verified);
}

#[test]
fn a_forged_argument_against_an_unrelated_output_batch_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(31);
    let (ciphertexts, pk, generator) = mix_node_inputs(9, &mut rng);
    let gq = generator.group_arc().clone();
    let zq = Arc::new(gq.exponent_group());
    let (_, n) = matrix_dimensions(9).unwrap();
    let ck = get_verifiable_commitment_key(n, gq).unwrap();

    let (shuffled, permutation, randomness) = shuffle_op::shuffle(&ciphertexts, &generator, &pk, zq.clone(), &mut rng).unwrap();
    let statement = ShuffleStatement::new(ciphertexts.clone(), shuffled, pk.clone(), generator.clone()).unwrap();
    let witness = ShuffleWitness::new(permutation, randomness).unwrap();
    let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();

    // An entirely independent honest shuffle of the same input is a
    // different, equally valid output batch; the first argument must not
    // verify against it.
    let (other_shuffled, _, _) = shuffle_op::shuffle(&ciphertexts.clone(), &generator, &pk, zq, &mut rng).unwrap();
    let other_statement = ShuffleStatement::new(ciphertexts, other_shuffled, pk, generator).unwrap();
    let result = verify(&other_statement, &argument, &ck).unwrap();
    assert!(!result.is_verified());
}

#[test]
fn batch_size_mismatch_is_rejected_before_any_cryptography_runs() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let (ciphertexts, pk, generator) = mix_node_inputs(3, &mut rng);
    let (shuffled, _, _) = mix_node_inputs(2, &mut rng);
    let err = ShuffleStatement::new(ciphertexts, shuffled, pk, generator).unwrap_err();
    assert_eq!(err.to_string(), "invalid argument: same size");
}
