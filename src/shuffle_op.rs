//! The permutation-and-rerandomization operator a mix node applies to a
//! batch of ciphertexts before proving the result correct with
//! [`crate::zkp::shuffle_argument`].

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::elgamal::{Ciphertext, PublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::params::ZqGroup;

/// A bijection on `{0, …, n-1}`. `apply(j)` is the new position of the
/// element originally at index `j`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    image: Vec<usize>,
}

impl Permutation {
    /// Builds a permutation from its image, checking it is actually a
    /// bijection on `0..image.len()`.
    pub fn new(image: Vec<usize>) -> CryptoResult<Self> {
        let n = image.len();
        let mut seen = vec![false; n];
        for &i in &image {
            if i >= n || seen[i] {
                return Err(CryptoError::invalid("permutation image must be a bijection on 0..n"));
            }
            seen[i] = true;
        }
        Ok(Permutation { image })
    }

    pub fn identity(n: usize) -> Self {
        Permutation { image: (0..n).collect() }
    }

    /// A uniformly random permutation of `0..n`, via Fisher-Yates.
    pub fn random<R: RngCore>(n: usize, rng: &mut R) -> Self {
        let mut image: Vec<usize> = (0..n).collect();
        image.shuffle(rng);
        Permutation { image }
    }

    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    /// The new position of the element originally at `j`.
    pub fn apply(&self, j: usize) -> usize {
        self.image[j]
    }

    pub fn image(&self) -> &[usize] {
        &self.image
    }

    pub fn inverse(&self) -> Self {
        let mut inv = vec![0usize; self.image.len()];
        for (j, &i) in self.image.iter().enumerate() {
            inv[i] = j;
        }
        Permutation { image: inv }
    }
}

/// Applies `permutation` to `ciphertexts`, rerandomizing each entry with the
/// matching element of `randomness`: the ciphertext originally at `j`
/// becomes `C'_{π(j)} = E(1; randomness[j]) · C_j`.
pub fn apply(
    ciphertexts: &[Ciphertext],
    permutation: &Permutation,
    randomness: &[ZqElement],
    generator: &GqElement,
    pk: &PublicKey,
) -> CryptoResult<Vec<Ciphertext>> {
    if ciphertexts.len() != permutation.len() || ciphertexts.len() != randomness.len() {
        return Err(CryptoError::invalid("shuffle input length mismatch"));
    }
    let mut shuffled: Vec<Option<Ciphertext>> = (0..ciphertexts.len()).map(|_| None).collect();
    for (j, (c, r)) in ciphertexts.iter().zip(randomness.iter()).enumerate() {
        let new_index = permutation.apply(j);
        shuffled[new_index] = Some(c.rerandomize(r, generator, pk)?);
    }
    shuffled
        .into_iter()
        .map(|c| c.ok_or_else(|| CryptoError::Internal("shuffle left a gap: permutation was not a bijection".into())))
        .collect()
}

/// Samples a fresh random permutation and independent rerandomization
/// factors and applies them: the operation a mix node performs on its input
/// batch, producing the witness `ShuffleArg` later proves correct.
pub fn shuffle<R: RngCore>(
    ciphertexts: &[Ciphertext],
    generator: &GqElement,
    pk: &PublicKey,
    zq: Arc<ZqGroup>,
    rng: &mut R,
) -> CryptoResult<(Vec<Ciphertext>, Permutation, Vec<ZqElement>)> {
    let n = ciphertexts.len();
    let permutation = Permutation::random(n, rng);
    let randomness: Vec<ZqElement> = (0..n).map(|_| ZqElement::random(rng, zq.clone())).collect();
    let shuffled = apply(ciphertexts, &permutation, &randomness, generator, pk)?;
    Ok((shuffled, permutation, randomness))
}
