//! Benchmarks for proving and verifying a shuffle argument at a few batch
//! sizes. Uses the small documented test group (not a production-sized
//! safe prime) so the benchmark itself runs in reasonable time; relative
//! cost between batch sizes and between prove/verify is what these track.

use std::sync::Arc;

use bgshuffle::commitment::get_verifiable_commitment_key;
use bgshuffle::elgamal::{encrypt_message, Ciphertext, PublicKey};
use bgshuffle::group::element::{GqElement, ZqElement};
use bgshuffle::group::params::GqGroup;
use bgshuffle::matrix_utils::matrix_dimensions;
use bgshuffle::shuffle_op;
use bgshuffle::zkp::shuffle_argument::{self, ShuffleStatement, ShuffleWitness};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn small_group() -> Arc<GqGroup> {
    Arc::new(GqGroup::new(BigUint::from(23u32), BigUint::from(11u32), BigUint::from(6u32)).unwrap())
}

fn sample_ciphertexts(n: usize, rng: &mut ChaCha20Rng) -> (Vec<Ciphertext>, PublicKey, GqElement) {
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

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_argument");
    for &n in &[4usize, 9, 16] {
        let mut rng = ChaCha20Rng::seed_from_u64(n as u64);
        let (ciphertexts, pk, generator) = sample_ciphertexts(n, &mut rng);
        let gq = generator.group_arc().clone();
        let zq = Arc::new(gq.exponent_group());
        let (_, cols) = matrix_dimensions(n).unwrap();
        let ck = get_verifiable_commitment_key(cols, gq).unwrap();

        let (shuffled, permutation, randomness) = shuffle_op::shuffle(&ciphertexts, &generator, &pk, zq, &mut rng).unwrap();
        let statement = ShuffleStatement::new(ciphertexts, shuffled, pk, generator).unwrap();
        let witness = ShuffleWitness::new(permutation, randomness).unwrap();

        group.bench_with_input(BenchmarkId::new("prove", n), &n, |b, _| {
            b.iter(|| shuffle_argument::prove(&statement, &witness, &ck, &mut rng).unwrap());
        });

        let argument = shuffle_argument::prove(&statement, &witness, &ck, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("verify", n), &n, |b, _| {
            b.iter(|| shuffle_argument::verify(&statement, &argument, &ck).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_shuffle);
criterion_main!(benches);
