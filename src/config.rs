//! Recognized configuration options.
//!
//! The core itself is stateless; these types exist so that callers who do
//! carry configuration (a CLI, a service) have a single place to express the
//! two knobs this crate recognizes: how large a group counts as
//! production-grade, and which digest backs the Fiat-Shamir transcript.

use serde::{Deserialize, Serialize};

/// Expected bit length of the safe prime `p` for a group the crate was
/// asked to treat as production-grade, versus a small test group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityLevel {
    /// 2048-bit `p`.
    Default2048,
    /// 3072-bit `p`.
    Extended3072,
}

impl SecurityLevel {
    /// Minimum bit length of `p` this level requires.
    pub fn min_p_bits(self) -> u64 {
        match self {
            SecurityLevel::Default2048 => 2048,
            SecurityLevel::Extended3072 => 3072,
        }
    }
}

/// Recognized Fiat-Shamir digest algorithms. Only SHA-256 is implemented;
/// the enum exists so configuration can name it explicitly and so a future
/// algorithm has somewhere to go without changing call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha256,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha256
    }
}
