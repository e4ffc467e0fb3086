//! Multi-recipient ElGamal ciphertext algebra: the operations the shuffle
//! and multi-exponentiation arguments need, not a full encryption scheme.

use std::sync::Arc;

use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, GroupElem, ZqElement};
use crate::group::params::GqGroup;

/// `pk = (pk_1, …, pk_k)`: `k` non-identity elements of one `Gq`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    keys: Vec<GqElement>,
}

impl PublicKey {
    pub fn new(keys: Vec<GqElement>) -> CryptoResult<Self> {
        if keys.is_empty() {
            return Err(CryptoError::invalid("public key needs at least one component"));
        }
        let group = keys[0].group_arc().clone();
        for k in &keys {
            if k.group_arc() != &group {
                return Err(CryptoError::invalid("public key components must share one group"));
            }
            if k.is_identity() {
                return Err(CryptoError::invalid("public key components must not be the identity"));
            }
        }
        Ok(PublicKey { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn components(&self) -> &[GqElement] {
        &self.keys
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.keys[0].group_arc()
    }
}

/// A multi-recipient ElGamal ciphertext `(γ, φ_1, …, φ_l)`: `l + 1` `Gq`
/// elements, all in one group. `l` is the ciphertext's "width".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    gamma: GqElement,
    phis: Vec<GqElement>,
}

impl Ciphertext {
    pub fn new(gamma: GqElement, phis: Vec<GqElement>) -> CryptoResult<Self> {
        if phis.is_empty() {
            return Err(CryptoError::invalid("ciphertext needs at least one phi component"));
        }
        let group = gamma.group_arc().clone();
        for phi in &phis {
            if phi.group_arc() != &group {
                return Err(CryptoError::invalid("ciphertext components must share one group"));
            }
        }
        Ok(Ciphertext { gamma, phis })
    }

    pub fn width(&self) -> usize {
        self.phis.len()
    }

    pub fn gamma(&self) -> &GqElement {
        &self.gamma
    }

    pub fn phis(&self) -> &[GqElement] {
        &self.phis
    }

    pub fn group(&self) -> &Arc<GqGroup> {
        self.gamma.group_arc()
    }

    /// The neutral ciphertext `(1, 1, …, 1)` of the given width.
    pub fn neutral(width: usize, group: Arc<GqGroup>) -> CryptoResult<Self> {
        if width == 0 {
            return Err(CryptoError::invalid("ciphertext width must be at least 1"));
        }
        let gamma = GqElement::identity(group.clone());
        let phis = (0..width).map(|_| GqElement::identity(group.clone())).collect();
        Ok(Ciphertext { gamma, phis })
    }

    fn check_compatible(&self, other: &Self) -> CryptoResult<()> {
        if self.group() != other.group() {
            return Err(CryptoError::group_mismatch(self.group().to_string(), other.group().to_string()));
        }
        if self.width() != other.width() {
            return Err(CryptoError::invalid(format!(
                "ciphertext width mismatch: {} vs {}",
                self.width(),
                other.width()
            )));
        }
        Ok(())
    }

    /// Componentwise ciphertext multiplication: `(γ·γ', φ_1·φ_1', …)`.
    pub fn multiply(&self, other: &Self) -> CryptoResult<Self> {
        self.check_compatible(other)?;
        let gamma = self.gamma.multiply(&other.gamma)?;
        let phis = self
            .phis
            .iter()
            .zip(other.phis.iter())
            .map(|(a, b)| a.multiply(b))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ciphertext::new(gamma, phis)
    }

    /// Componentwise exponentiation by a scalar: `(γ^x, φ_1^x, …)`.
    pub fn exponentiate(&self, exponent: &ZqElement) -> CryptoResult<Self> {
        let gamma = self.gamma.exponentiate(exponent)?;
        let phis = self
            .phis
            .iter()
            .map(|phi| phi.exponentiate(exponent))
            .collect::<CryptoResult<Vec<_>>>()?;
        Ciphertext::new(gamma, phis)
    }

    /// Re-encrypts under fresh randomness `r` and `pk`: multiplies in an
    /// encryption of the identity plaintext, `(g^r, pk_1^r, …, pk_l^r)`.
    pub fn rerandomize(&self, r: &ZqElement, generator: &GqElement, pk: &PublicKey) -> CryptoResult<Self> {
        if pk.len() != self.width() {
            return Err(CryptoError::invalid(format!(
                "public key width {} does not match ciphertext width {}",
                pk.len(),
                self.width()
            )));
        }
        let blind = encrypt_neutral(r, generator, pk)?;
        self.multiply(&blind)
    }
}

/// Lets `GroupMatrix<Ciphertext>`/`GroupVector<Ciphertext>` reshape and
/// group-check batches of ciphertexts the same way they do `Gq`/`Zq`
/// elements; `MultiExpArg`'s ciphertext matrix is the main user.
impl GroupElem for Ciphertext {
    type Group = Arc<GqGroup>;

    fn group(&self) -> &Self::Group {
        self.gamma.group_arc()
    }
}

/// `E(1; r) = (g^r, pk_1^r, …, pk_l^r)`: an encryption of the identity
/// plaintext under randomness `r`, independent of any existing ciphertext.
/// `MultiExpArg` needs this directly (not just as part of a rerandomize).
pub fn encrypt_neutral(r: &ZqElement, generator: &GqElement, pk: &PublicKey) -> CryptoResult<Ciphertext> {
    let gamma = generator.exponentiate(r)?;
    let phis = pk
        .components()
        .iter()
        .map(|pk_i| pk_i.exponentiate(r))
        .collect::<CryptoResult<Vec<_>>>()?;
    Ciphertext::new(gamma, phis)
}

/// `E(m; r) = (g^r, pk_1^r·m, …, pk_l^r·m)`: a multi-recipient encryption of
/// the same plaintext `m` (typically `g^b` for some exponent `b`) broadcast
/// to every recipient, under randomness `r`. `MultiExpArg` uses this to fold
/// its per-diagonal plaintext blinds into the argument's `E_k` values.
pub fn encrypt_message(message: &GqElement, r: &ZqElement, generator: &GqElement, pk: &PublicKey) -> CryptoResult<Ciphertext> {
    let neutral = encrypt_neutral(r, generator, pk)?;
    let phis = neutral
        .phis
        .iter()
        .map(|phi| phi.multiply(message))
        .collect::<CryptoResult<Vec<_>>>()?;
    Ciphertext::new(neutral.gamma, phis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::params::GqGroup;
    use num_bigint::BigUint;

    fn group() -> Arc<GqGroup> {
        Arc::new(GqGroup::new(BigUint::from(23u32), BigUint::from(11u32), BigUint::from(6u32)).unwrap())
    }

    fn elem(v: u64, g: &Arc<GqGroup>) -> GqElement {
        GqElement::new(BigUint::from(v), g.clone()).unwrap()
    }

    #[test]
    fn multiply_by_neutral_is_identity_operation() {
        let g = group();
        let neutral = Ciphertext::neutral(2, g.clone()).unwrap();
        let c = Ciphertext::new(elem(6, &g), vec![elem(2, &g), elem(3, &g)]).unwrap();
        let product = c.multiply(&neutral).unwrap();
        assert_eq!(product, c);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let g = group();
        let a = Ciphertext::new(elem(6, &g), vec![elem(2, &g)]).unwrap();
        let b = Ciphertext::new(elem(6, &g), vec![elem(2, &g), elem(3, &g)]).unwrap();
        assert!(a.multiply(&b).is_err());
    }

    #[test]
    fn rerandomize_preserves_width() {
        let g = group();
        let zq = Arc::new(g.exponent_group());
        let pk = PublicKey::new(vec![elem(2, &g)]).unwrap();
        let generator = GqElement::generator(g.clone());
        let c = Ciphertext::new(elem(6, &g), vec![elem(3, &g)]).unwrap();
        let r = ZqElement::from_u64(4, zq);
        let reran = c.rerandomize(&r, &generator, &pk).unwrap();
        assert_eq!(reran.width(), c.width());
        assert_ne!(reran, c);
    }
}
