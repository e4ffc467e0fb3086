//! The Fiat-Shamir transform: a recursive, domain-separated hash over a
//! small typed value language, reduced into a challenge in `Zq`.
//!
//! Every argument in `zkp::*` builds a `Vec<Hashable>` transcript in a fixed
//! order (group parameters, then commitment key, then public key, then the
//! statement, then each round's commitments) and calls
//! [`HashTranscript::challenge`] on it. Prover and verifier derive the same
//! challenge only if they hash the exact same sequence in the exact same
//! order — reordering a single commitment changes every challenge after it.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::params::ZqGroup;

const TAG_BYTES: u8 = 0;
const TAG_INTEGER: u8 = 1;
const TAG_LIST: u8 = 2;

/// A value that can appear in a Fiat-Shamir transcript: raw bytes, a signed
/// integer, or an ordered list of more `Hashable`s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hashable {
    Bytes(Vec<u8>),
    Integer(BigInt),
    List(Vec<Hashable>),
}

impl Hashable {
    pub fn from_biguint(value: &BigUint) -> Self {
        Hashable::Integer(BigInt::from_biguint(Sign::Plus, value.clone()))
    }

    pub fn from_str(s: &str) -> Self {
        Hashable::Bytes(s.as_bytes().to_vec())
    }

    pub fn list(items: impl IntoIterator<Item = Hashable>) -> Self {
        Hashable::List(items.into_iter().collect())
    }

    /// Recursive encoding: a domain tag byte, then type-specific bytes.
    /// Integers use signed big-endian two's-complement with no redundant
    /// leading sign-extension byte (`BigInt::to_signed_bytes_be` already
    /// gives exactly that).
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Hashable::Bytes(bytes) => {
                out.push(TAG_BYTES);
                out.extend_from_slice(bytes);
            }
            Hashable::Integer(n) => {
                out.push(TAG_INTEGER);
                out.extend_from_slice(&n.to_signed_bytes_be());
            }
            Hashable::List(items) => {
                out.push(TAG_LIST);
                for item in items {
                    item.encode(out);
                }
            }
        }
    }
}

impl From<&GqElement> for Hashable {
    fn from(e: &GqElement) -> Self {
        Hashable::from_biguint(e.value())
    }
}

impl From<&ZqElement> for Hashable {
    fn from(e: &ZqElement) -> Self {
        Hashable::from_biguint(e.value())
    }
}

/// Computes `SHA-256(encode(x_1) || encode(x_2) || …)` over a transcript,
/// then reduces the digest into `Zq`, enforcing the bit-length discipline
/// that keeps the reduction unbiased for groups the caller asserts are
/// production-sized.
pub struct HashTranscript {
    q_bits: u64,
    enforce_bit_length: bool,
}

impl HashTranscript {
    /// A transcript hasher bound to `group`'s exponent field. Rejects
    /// construction if the digest (SHA-256, 256 bits) could exceed
    /// `bitlen(q)` for a group large enough that the caller expects a
    /// production-grade reduction (`q_bits >= 256`); smaller test groups
    /// are allowed to use plain modular reduction, since a bias there has
    /// no security consequence and rejecting would make tiny test vectors
    /// impossible to construct.
    pub fn new(q: &ZqGroup) -> Self {
        let q_bits = q.bits();
        HashTranscript {
            q_bits,
            enforce_bit_length: q_bits >= 256,
        }
    }

    /// Hashes `transcript` and reduces the result into an element of
    /// `group`.
    pub fn challenge(&self, transcript: &[Hashable], group: Arc<ZqGroup>) -> CryptoResult<ZqElement> {
        if self.enforce_bit_length && 256 >= self.q_bits {
            return Err(CryptoError::Internal(format!(
                "hash output (256 bits) is not strictly smaller than bitlen(q) ({})",
                self.q_bits
            )));
        }
        let digest = Self::digest(transcript);
        let value = BigUint::from_bytes_be(&digest) % group.q();
        Ok(ZqElement::new(value, group))
    }

    fn digest(transcript: &[Hashable]) -> [u8; 32] {
        let mut bytes = Vec::new();
        for item in transcript {
            item.encode(&mut bytes);
        }
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Raw digest bytes, reduced mod an arbitrary modulus. Used by
    /// [`crate::commitment::get_verifiable_commitment_key`], which reduces
    /// mod `p` rather than `q`.
    pub fn digest_reduced(transcript: &[Hashable], modulus: &BigUint) -> BigUint {
        let digest = Self::digest(transcript);
        if modulus.is_zero() {
            return BigUint::from_bytes_be(&digest);
        }
        BigUint::from_bytes_be(&digest) % modulus
    }
}
