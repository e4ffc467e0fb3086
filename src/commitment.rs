//! Pedersen-style commitment to a vector of exponents, `com(a, r; ck) = h^r
//! · ∏ g_i^{a_i}`, and the deterministic derivation of a "verifiable"
//! commitment key (one whose generators nobody knows the discrete log of).

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;

use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::matrix::GroupMatrix;
use crate::group::params::GqGroup;
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};

/// `ck = (h, g_1, …, g_k)`: `k + 1` non-identity, non-generator elements of
/// one `Gq`, used as the bases for Pedersen commitments of width up to `k`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentKey {
    h: GqElement,
    g: Vec<GqElement>,
}

impl CommitmentKey {
    /// Builds a key from already-derived elements, checking the shared-group
    /// and non-identity/non-generator invariants.
    pub fn new(h: GqElement, g: Vec<GqElement>) -> CryptoResult<Self> {
        if g.is_empty() {
            return Err(CryptoError::invalid("commitment key needs at least one generator g_i"));
        }
        let group = h.group_arc().clone();
        for e in std::iter::once(&h).chain(g.iter()) {
            if e.group_arc() != &group {
                return Err(CryptoError::invalid("commitment key elements must share one group"));
            }
            if e.is_identity() {
                return Err(CryptoError::invalid("commitment key elements must not be the identity"));
            }
            if e.value() == group.g() {
                return Err(CryptoError::invalid(
                    "commitment key elements must not equal the group's generator",
                ));
            }
        }
        Ok(CommitmentKey { h, g })
    }

    pub fn h(&self) -> &GqElement {
        &self.h
    }

    pub fn g(&self) -> &[GqElement] {
        &self.g
    }

    pub fn k(&self) -> usize {
        self.g.len()
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.h.group_arc()
    }
}

/// `com(a, r; ck) = h^r · ∏_i g_i^{a_i}`. Fails if `a` is longer than
/// `ck.k()`, if `a` and `r` live in different `Zq` groups, or if `ck`'s `Gq`
/// order doesn't match `a`'s `Zq` order. Indices beyond `a.len()` (when `a`
/// is shorter than `k`) are treated as exponent zero.
pub fn get_commitment(a: &GroupVector<ZqElement>, r: &ZqElement, ck: &CommitmentKey) -> CryptoResult<GqElement> {
    if a.len() > ck.k() {
        return Err(CryptoError::invalid(format!(
            "commitment input length {} exceeds commitment key width {}",
            a.len(),
            ck.k()
        )));
    }
    if a.group() != r.group_arc() {
        return Err(CryptoError::group_mismatch(a.group().to_string(), r.group_arc().to_string()));
    }
    if ck.group().q() != a.group().q() {
        return Err(CryptoError::group_mismatch(ck.group().to_string(), a.group().to_string()));
    }

    let mut acc = ck.h().exponentiate(r)?;
    for (g_i, a_i) in ck.g().iter().zip(a.iter()) {
        acc = acc.multiply(&g_i.exponentiate(a_i)?)?;
    }
    Ok(acc)
}

/// Commits each column of `matrix` independently; `randomness.len()` must
/// equal the number of columns.
pub fn get_commitment_matrix(
    matrix: &GroupMatrix<ZqElement>,
    randomness: &GroupVector<ZqElement>,
    ck: &CommitmentKey,
) -> CryptoResult<GroupVector<GqElement>> {
    if randomness.len() != matrix.num_columns() {
        return Err(CryptoError::invalid(format!(
            "randomness length {} does not match matrix column count {}",
            randomness.len(),
            matrix.num_columns()
        )));
    }
    let mut commitments = Vec::with_capacity(matrix.num_columns());
    for (col_idx, r) in randomness.iter().enumerate() {
        let column: Vec<ZqElement> = matrix.get_column(col_idx).expect("column index in range").into_iter().cloned().collect();
        let column_vector = GroupVector::new(column)?;
        commitments.push(get_commitment(&column_vector, r, ck)?);
    }
    GroupVector::new(commitments)
}

/// Deterministically derives `(h, g_1, …, g_k)` from `group` via rejection
/// sampling: hash `(p, q, g, "commitmentKey", counter)`, reduce mod `p`,
/// keep the first candidates that are non-identity, non-generator, and
/// members of the order-`q` subgroup. Same `(k, group)` always yields the
/// same key. `k` must satisfy `1 <= k <= q - 3` (leaves room for `h` plus
/// the identity and generator that get skipped somewhere in the sampling).
pub fn get_verifiable_commitment_key(k: usize, group: Arc<GqGroup>) -> CryptoResult<CommitmentKey> {
    let q_minus_3 = group.q() - BigUint::from(3u32);
    if k == 0 || BigUint::from(k as u64) > q_minus_3 {
        return Err(CryptoError::invalid(format!(
            "commitment key width must satisfy 1 <= k <= q - 3, got k = {k}"
        )));
    }

    let mut candidates = Vec::with_capacity(k + 1);
    let mut counter: u64 = 0;
    while candidates.len() < k + 1 {
        let transcript = vec![
            Hashable::from_biguint(group.p()),
            Hashable::from_biguint(group.q()),
            Hashable::from_biguint(group.g()),
            Hashable::from_str("commitmentKey"),
            Hashable::Integer(num_bigint::BigInt::from(counter)),
        ];
        counter += 1;
        let candidate = HashTranscript::digest_reduced(&transcript, group.p());
        if candidate.is_zero() || candidate == BigUint::one() || &candidate == group.g() {
            continue;
        }
        if !group.is_member(&candidate) {
            continue;
        }
        candidates.push(GqElement::new_unchecked(candidate, group.clone()));
    }

    let h = candidates.remove(0);
    CommitmentKey::new(h, candidates)
}
