//! Crate-wide error type.
//!
//! Every fallible constructor in this crate fails fast: a partially built
//! argument, statement, or witness never leaves the function that builds it
//! (see the builder-pattern discussion in `DESIGN.md`). Verification failure
//! is deliberately *not* modeled as an `Err` of this type — see
//! [`crate::zkp::VerificationResult`].

use thiserror::Error;

/// The single error kind produced by this crate's fallible constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A precondition on the shape or value of an argument was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required input was absent (null/empty where a value was mandatory).
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// Two operands that must share a group did not.
    ///
    /// Rendered with the same `InvalidArgument` message shape, since callers
    /// that only pattern-match on message text still see a sensible error;
    /// callers that care can match the variant directly.
    #[error("invalid argument: group mismatch (expected {expected}, found {found})")]
    GroupMismatch { expected: String, found: String },

    /// Unexpected internal failure: a hash collision, RNG exhaustion, or
    /// another condition that should be statistically impossible given
    /// correct inputs.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CryptoError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CryptoError::InvalidArgument(msg.into())
    }

    pub fn group_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        CryptoError::GroupMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;
