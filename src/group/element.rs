//! Group elements: `GqElement` (a member of the order-q subgroup of Z*_p)
//! and `ZqElement` (an exponent, an integer mod q).
//!
//! Both carry a shared handle to the parameters that define their group, so
//! that combining two elements from different groups is a runtime error
//! rather than silently producing a meaningless value.

use std::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::group::params::{GqGroup, ZqGroup};

/// A trait implemented by both element kinds so that `GroupVector`/
/// `GroupMatrix` can be generic over either, while still enforcing that all
/// members share one group.
pub trait GroupElem: Clone + fmt::Debug {
    /// The group parameters type (`Arc<GqGroup>` or `Arc<ZqGroup>`).
    type Group: Clone + PartialEq + fmt::Display;

    fn group(&self) -> &Self::Group;
}

/// An element of `Gq`, the order-`q` subgroup of `(Z/pZ)*`.
#[derive(Clone, Debug)]
pub struct GqElement {
    value: BigUint,
    group: Arc<GqGroup>,
}

impl GqElement {
    /// Builds a group element, validating membership (`value^q == 1 mod p`)
    /// against `group`.
    pub fn new(value: BigUint, group: Arc<GqGroup>) -> CryptoResult<Self> {
        if !group.is_member(&value) {
            return Err(CryptoError::invalid(format!(
                "{value} is not a member of {group}"
            )));
        }
        Ok(GqElement { value, group })
    }

    /// Builds a group element without re-checking subgroup membership. Used
    /// internally once a value is already known (by construction) to be a
    /// member, to avoid a redundant `modpow`.
    pub(crate) fn new_unchecked(value: BigUint, group: Arc<GqGroup>) -> Self {
        debug_assert!(group.is_member(&value), "internal invariant violated");
        GqElement { value, group }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn identity(group: Arc<GqGroup>) -> Self {
        GqElement {
            value: BigUint::one(),
            group,
        }
    }

    pub fn generator(group: Arc<GqGroup>) -> Self {
        let g = group.g().clone();
        GqElement { value: g, group }
    }

    pub fn is_identity(&self) -> bool {
        self.value.is_one()
    }

    fn check_same_group(&self, other: &Self) -> CryptoResult<()> {
        if self.group != other.group {
            return Err(CryptoError::group_mismatch(
                self.group.to_string(),
                other.group.to_string(),
            ));
        }
        Ok(())
    }

    /// `self * other mod p`.
    pub fn multiply(&self, other: &Self) -> CryptoResult<Self> {
        self.check_same_group(other)?;
        let value = (&self.value * &other.value) % self.group.p();
        Ok(GqElement::new_unchecked(value, self.group.clone()))
    }

    /// `self^-1 mod p`.
    pub fn invert(&self) -> Self {
        let p = self.group.p();
        let exponent = p - BigUint::from(2u32);
        let value = self.value.modpow(&exponent, p);
        GqElement::new_unchecked(value, self.group.clone())
    }

    /// `self^scalar mod p`, `scalar` drawn from the matching `ZqGroup`.
    pub fn exponentiate(&self, scalar: &ZqElement) -> CryptoResult<Self> {
        if self.group.q() != scalar.group().q() {
            return Err(CryptoError::group_mismatch(
                self.group.to_string(),
                scalar.group().to_string(),
            ));
        }
        let value = self.value.modpow(scalar.value(), self.group.p());
        Ok(GqElement::new_unchecked(value, self.group.clone()))
    }

    pub fn group_arc(&self) -> &Arc<GqGroup> {
        &self.group
    }
}

impl PartialEq for GqElement {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.value == other.value
    }
}
impl Eq for GqElement {}

impl GroupElem for GqElement {
    type Group = Arc<GqGroup>;
    fn group(&self) -> &Self::Group {
        &self.group
    }
}

impl fmt::Display for GqElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// `GqElement`/`ZqElement` serialize as decimal-string values (arbitrary
/// precision integers don't fit in a JSON number losslessly); the
/// surrounding statement/witness/argument structs attach the field names.
impl Serialize for GqElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value.to_str_radix(10))
    }
}

/// Deserializing a bare `GqElement` needs a group to validate membership
/// against, which JSON doesn't carry per-element; callers deserialize a
/// decimal string themselves and go through [`GqElement::new`] with the
/// group already in hand (see `DeserializeSeed` uses in `zkp::*` for the
/// structs that carry elements alongside a statement's group).
pub struct GqElementSeed(pub Arc<GqGroup>);

impl<'de> serde::de::DeserializeSeed<'de> for GqElementSeed {
    type Value = GqElement;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| serde::de::Error::custom("not a decimal integer"))?;
        GqElement::new(value, self.0).map_err(serde::de::Error::custom)
    }
}

/// An element of `Zq`, the exponent field: an integer in `[0, q-1]`.
#[derive(Clone, Debug)]
pub struct ZqElement {
    value: BigUint,
    group: Arc<ZqGroup>,
}

impl ZqElement {
    pub fn new(value: BigUint, group: Arc<ZqGroup>) -> Self {
        let reduced = value % group.q();
        ZqElement {
            value: reduced,
            group,
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn zero(group: Arc<ZqGroup>) -> Self {
        ZqElement {
            value: BigUint::zero(),
            group,
        }
    }

    pub fn one(group: Arc<ZqGroup>) -> Self {
        ZqElement {
            value: BigUint::one(),
            group,
        }
    }

    pub fn random<R: RngCore>(rng: &mut R, group: Arc<ZqGroup>) -> Self {
        let value = group.random_value(rng);
        ZqElement { value, group }
    }

    pub fn from_u64(v: u64, group: Arc<ZqGroup>) -> Self {
        ZqElement::new(BigUint::from(v), group)
    }

    fn check_same_group(&self, other: &Self) -> CryptoResult<()> {
        if self.group != other.group {
            return Err(CryptoError::group_mismatch(
                self.group.to_string(),
                other.group.to_string(),
            ));
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> CryptoResult<Self> {
        self.check_same_group(other)?;
        let value = (&self.value + &other.value) % self.group.q();
        Ok(ZqElement {
            value,
            group: self.group.clone(),
        })
    }

    pub fn subtract(&self, other: &Self) -> CryptoResult<Self> {
        self.check_same_group(other)?;
        let q = self.group.q();
        let value = (q + &self.value - &other.value) % q;
        Ok(ZqElement {
            value,
            group: self.group.clone(),
        })
    }

    pub fn negate(&self) -> Self {
        let q = self.group.q();
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            q - &self.value
        };
        ZqElement {
            value,
            group: self.group.clone(),
        }
    }

    pub fn multiply(&self, other: &Self) -> CryptoResult<Self> {
        self.check_same_group(other)?;
        let value = (&self.value * &other.value) % self.group.q();
        Ok(ZqElement {
            value,
            group: self.group.clone(),
        })
    }

    /// Multiplicative inverse mod `q`, via Fermat's little theorem (`q` is
    /// prime). `None` for the zero element.
    pub fn invert(&self) -> Option<Self> {
        if self.value.is_zero() {
            return None;
        }
        let q = self.group.q();
        let exponent = q - BigUint::from(2u32);
        let value = self.value.modpow(&exponent, q);
        Some(ZqElement {
            value,
            group: self.group.clone(),
        })
    }

    pub fn pow(&self, exponent: u64) -> Self {
        let value = self.value.modpow(&BigUint::from(exponent), self.group.q());
        ZqElement {
            value,
            group: self.group.clone(),
        }
    }

    pub fn group_arc(&self) -> &Arc<ZqGroup> {
        &self.group
    }
}

impl PartialEq for ZqElement {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.value == other.value
    }
}
impl Eq for ZqElement {}

impl GroupElem for ZqElement {
    type Group = Arc<ZqGroup>;
    fn group(&self) -> &Self::Group {
        &self.group
    }
}

impl fmt::Display for ZqElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for ZqElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value.to_str_radix(10))
    }
}

/// See [`GqElementSeed`]: `ZqElement` likewise needs its group supplied by
/// the caller rather than carried in the JSON.
pub struct ZqElementSeed(pub Arc<ZqGroup>);

impl<'de> serde::de::DeserializeSeed<'de> for ZqElementSeed {
    type Value = ZqElement;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| serde::de::Error::custom("not a decimal integer"))?;
        Ok(ZqElement::new(value, self.0))
    }
}
