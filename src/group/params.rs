//! Group parameters: `GqGroup` (the order-q subgroup of Z*_p) and `ZqGroup`
//! (the exponent field, integers mod q).

use std::fmt;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// `p = 2q + 1`, `q` prime, `g` a generator of the order-`q` subgroup of
/// `(Z/pZ)*`. Elements of the group are integers in `[1, p-1]` whose
/// `q`-th power is congruent to 1 mod `p`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GqGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl GqGroup {
    /// Validates the safe-prime relation, that `q` is (probably) prime, and
    /// that `g` actually generates the order-`q` subgroup, before
    /// constructing the group.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> CryptoResult<Self> {
        let one = BigUint::one();
        let two = &one + &one;
        if p != &two * &q + &one {
            return Err(CryptoError::invalid("p must equal 2q + 1"));
        }
        if !is_probable_prime(&q, 40) {
            return Err(CryptoError::invalid("q must be prime"));
        }
        if g.is_zero() || g >= p {
            return Err(CryptoError::invalid("g must lie in [1, p-1]"));
        }
        if g.modpow(&q, &p) != one {
            return Err(CryptoError::invalid("g must generate the order-q subgroup"));
        }
        if g == one {
            return Err(CryptoError::invalid("g must not be the identity"));
        }
        Ok(GqGroup { p, q, g })
    }

    /// Constructs a group without re-deriving `q`'s primality or the
    /// subgroup relation. Only for callers (e.g. deserializers of trusted
    /// test vectors) that already know the parameters are sound; prefer
    /// [`GqGroup::new`] whenever the source is untrusted.
    pub fn new_unchecked(p: BigUint, q: BigUint, g: BigUint) -> Self {
        GqGroup { p, q, g }
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Bit length of `p`, used to decide whether this group is
    /// production-sized (see [`crate::hash`]'s bit-length discipline).
    pub fn p_bits(&self) -> u64 {
        self.p.bits()
    }

    /// `true` if `candidate` is a nonzero member of `[1, p-1]` whose `q`-th
    /// power is 1 mod `p`, i.e. an element of this Gq group.
    pub fn is_member(&self, candidate: &BigUint) -> bool {
        !candidate.is_zero() && *candidate < self.p && candidate.modpow(&self.q, &self.p).is_one()
    }

    /// The exponent-field group associated with this Gq group (same `q`).
    pub fn exponent_group(&self) -> ZqGroup {
        ZqGroup::new(self.q.clone())
    }
}

impl fmt::Display for GqGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gq(p={}, q={}, g={})", self.p, self.q, self.g)
    }
}

/// Integers mod `q`, the exponent field for a `GqGroup` of matching order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ZqGroup {
    q: BigUint,
}

impl ZqGroup {
    pub fn new(q: BigUint) -> Self {
        ZqGroup { q }
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn bits(&self) -> u64 {
        self.q.bits()
    }

    pub fn random_value<R: RngCore>(&self, rng: &mut R) -> BigUint {
        use num_bigint::RandBigInt;
        rng.gen_biguint_below(&self.q)
    }
}

impl fmt::Display for ZqGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zq(q={})", self.q)
    }
}

/// Miller-Rabin primality test, deterministic enough for the group sizes
/// this crate cares about (tiny test groups through 3072-bit safe primes)
/// at `rounds` >= 40. `num-bigint` has no primality test of its own.
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    let zero = BigUint::zero();
    let one = BigUint::one();
    let two = &one + &one;

    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // write n - 1 = d * 2^r with d odd
    let n_minus_one = n - &one;
    let mut d = n_minus_one.clone();
    let mut r: u32 = 0;
    while d.is_even() {
        d >>= 1u32;
        r += 1;
    }

    let small_witnesses: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    let mut rng = rand::thread_rng();
    use num_bigint::RandBigInt;

    let trial = |a: &BigUint| -> bool {
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            return true;
        }
        for _ in 0..r.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                return true;
            }
        }
        false
    };

    for w in small_witnesses.iter() {
        let a = BigUint::from(*w);
        if a >= *n {
            continue;
        }
        if !trial(&a) {
            return false;
        }
    }

    let extra_rounds = rounds.saturating_sub(small_witnesses.len() as u32);
    for _ in 0..extra_rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        if a == zero {
            continue;
        }
        if !trial(&a) {
            return false;
        }
    }

    true
}
