//! The nested Fiat-Shamir arguments that make up a Bayer-Groth shuffle
//! proof: `ZeroArg` at the bottom, composed upward through `HadamardArg`,
//! `SingleValueProductArg`, `ProductArg`, and `MultiExpArg`, into the outer
//! `ShuffleArg`.

pub mod hadamard_argument;
pub mod multi_exponentiation_argument;
pub mod product_argument;
pub mod shuffle_argument;
pub mod single_value_product_argument;
pub mod zero_argument;

/// The outcome of checking a proof. Deliberately not a `Result`: a rejected
/// proof is an expected, non-exceptional outcome of verification, not a
/// failure of the verifier itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Verified,
    Failed(String),
}

impl VerificationResult {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationResult::Verified)
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        VerificationResult::Failed(reason.into())
    }
}
