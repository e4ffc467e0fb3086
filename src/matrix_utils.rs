//! Reshaping a length-`N` vector into an `m × n` matrix for the outer
//! shuffle argument: pick `m, n` with `m * n == N`, `m <= n`, minimizing
//! `m + n`.

use crate::error::{CryptoError, CryptoResult};

/// Finds `(m, n)` with `m * n == n_total`, `m <= n`, minimizing `m + n`.
/// Equivalent to scanning divisors up to `sqrt(n_total)` and taking the
/// largest one that still divides evenly (that's the one closest to the
/// square root, which minimizes the sum of a factor pair with fixed
/// product).
pub fn matrix_dimensions(n_total: usize) -> CryptoResult<(usize, usize)> {
    if n_total == 0 {
        return Err(CryptoError::invalid("matrix_dimensions requires N > 0"));
    }
    let mut m = 1usize;
    let mut candidate = 1usize;
    while candidate * candidate <= n_total {
        if n_total % candidate == 0 {
            m = candidate;
        }
        candidate += 1;
    }
    let n = n_total / m;
    Ok((m, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero() {
        assert!(matrix_dimensions(0).is_err());
    }

    #[test]
    fn perfect_square_splits_evenly() {
        assert_eq!(matrix_dimensions(25).unwrap(), (5, 5));
    }

    #[test]
    fn matches_documented_table() {
        assert_eq!(matrix_dimensions(2).unwrap(), (1, 2));
        assert_eq!(matrix_dimensions(12).unwrap(), (3, 4));
        assert_eq!(matrix_dimensions(18).unwrap(), (3, 6));
        assert_eq!(matrix_dimensions(23).unwrap(), (1, 23));
        assert_eq!(matrix_dimensions(27).unwrap(), (3, 9));
    }

    #[test]
    fn one_stays_one_by_one() {
        assert_eq!(matrix_dimensions(1).unwrap(), (1, 1));
    }
}
