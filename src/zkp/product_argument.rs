//! Product Argument: proves a committed matrix `A` (n×m) has row-products
//! vector whose total product equals a public scalar, by reducing to
//! `HadamardArg` (m >= 2 case) composed with `SingleValueProductArg`.

use std::sync::Arc;

use rand::RngCore;

use crate::commitment::{get_commitment, get_commitment_matrix, CommitmentKey};
use crate::error::{CryptoError, CryptoResult};
use crate::group::element::{GqElement, ZqElement};
use crate::group::matrix::GroupMatrix;
use crate::group::params::ZqGroup;
use crate::group::vector::GroupVector;
use crate::hash::{Hashable, HashTranscript};
use crate::zkp::hadamard_argument::{self, HadamardArgument, HadamardStatement, HadamardWitness};
use crate::zkp::single_value_product_argument::{
    self, SingleValueProductArgument, SingleValueProductStatement, SingleValueProductWitness,
};
use crate::zkp::VerificationResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductStatement {
    c_a: GroupVector<GqElement>,
    b: ZqElement,
    /// Row count of the committed matrix; threaded through to the inner
    /// `HadamardStatement`, which needs it to rebuild its all-(-1) vector.
    n: usize,
}

impl ProductStatement {
    pub fn new(c_a: GroupVector<GqElement>, b: ZqElement, n: usize) -> Self {
        ProductStatement { c_a, b, n }
    }

    pub fn m(&self) -> usize {
        self.c_a.len()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn c_a(&self) -> &GroupVector<GqElement> {
        &self.c_a
    }

    pub fn b(&self) -> &ZqElement {
        &self.b
    }
}

#[derive(Clone, Debug)]
pub struct ProductWitness {
    a: GroupMatrix<ZqElement>,
    r: GroupVector<ZqElement>,
}

impl ProductWitness {
    pub fn new(a: GroupMatrix<ZqElement>, r: GroupVector<ZqElement>) -> CryptoResult<Self> {
        if r.len() != a.num_columns() {
            return Err(CryptoError::invalid("ProductWitness randomness length must equal A's column count"));
        }
        Ok(ProductWitness { a, r })
    }

    pub fn n(&self) -> usize {
        self.a.num_rows()
    }

    pub fn m(&self) -> usize {
        self.a.num_columns()
    }
}

/// `m == 1`: the argument is a bare single-value-product argument over A's
/// only column. `m >= 2`: payload also carries the committed row-products
/// vector `b` and a `HadamardArgument` certifying it against `A`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductArgument {
    Single(SingleValueProductArgument),
    Composed { c_b: GqElement, hadamard_argument: HadamardArgument, single_vpa: SingleValueProductArgument },
}

fn row_products(a: &GroupMatrix<ZqElement>) -> CryptoResult<Vec<ZqElement>> {
    let zq = a.group().clone();
    (0..a.num_rows())
        .map(|row| {
            let cells = a.get_row(row).ok_or_else(|| CryptoError::invalid("row index out of bounds"))?;
            let mut acc = ZqElement::one(zq.clone());
            for cell in cells {
                acc = acc.multiply(cell)?;
            }
            Ok(acc)
        })
        .collect()
}

pub fn prove<R: RngCore>(
    statement: &ProductStatement,
    witness: &ProductWitness,
    ck: &CommitmentKey,
    rng: &mut R,
) -> CryptoResult<ProductArgument> {
    let m = statement.m();
    if witness.m() != m {
        return Err(CryptoError::invalid("witness column count does not match statement length"));
    }

    if m == 1 {
        let a_col = GroupVector::new(witness.a.get_column(0).ok_or_else(|| CryptoError::invalid("A has no columns"))?.into_iter().cloned().collect())?;
        let r0 = witness.r.get(0).cloned().ok_or_else(|| CryptoError::invalid("witness.r is empty"))?;
        let svpa_witness = SingleValueProductWitness::new(a_col, r0)?;
        let c_a0 = statement.c_a().get(0).cloned().ok_or_else(|| CryptoError::invalid("statement.c_a is empty"))?;
        let svpa_statement = SingleValueProductStatement::new(c_a0, statement.b().clone())?;
        let svpa = single_value_product_argument::prove(&svpa_statement, &svpa_witness, ck, rng)?;
        return Ok(ProductArgument::Single(svpa));
    }

    let zq: Arc<ZqGroup> = Arc::new(ck.group().exponent_group());
    let b_rows = row_products(&witness.a)?;
    let s = ZqElement::random(rng, zq.clone());
    let b_vector = GroupVector::new(b_rows.clone())?;
    let c_b = get_commitment(&b_vector, &s, ck)?;

    let hadamard_witness = HadamardWitness::new(witness.a.clone(), b_vector.clone(), witness.r.clone(), s.clone())?;
    let hadamard_statement = HadamardStatement::new(statement.c_a().clone(), c_b.clone(), witness.n());
    let hadamard_argument = hadamard_argument::prove(&hadamard_statement, &hadamard_witness, ck, rng)?;

    let total_product = b_rows.iter().skip(1).try_fold(b_rows[0].clone(), |acc, b_i| acc.multiply(b_i))?;
    let svpa_witness = SingleValueProductWitness::new(b_vector, s)?;
    let svpa_statement = SingleValueProductStatement::new(c_b.clone(), total_product)?;
    let single_vpa = single_value_product_argument::prove(&svpa_statement, &svpa_witness, ck, rng)?;

    Ok(ProductArgument::Composed { c_b, hadamard_argument, single_vpa })
}

pub fn verify(statement: &ProductStatement, argument: &ProductArgument, ck: &CommitmentKey) -> CryptoResult<VerificationResult> {
    let m = statement.m();
    match argument {
        ProductArgument::Single(svpa) => {
            if m != 1 {
                return Ok(VerificationResult::failed("statement length does not match a single-column product argument"));
            }
            let c_a0 = statement.c_a().get(0).cloned().ok_or_else(|| CryptoError::invalid("statement.c_a is empty"))?;
            let svpa_statement = SingleValueProductStatement::new(c_a0, statement.b().clone())?;
            single_value_product_argument::verify(&svpa_statement, svpa, ck)
        }
        ProductArgument::Composed { c_b, hadamard_argument, single_vpa } => {
            if m < 2 {
                return Ok(VerificationResult::failed("composed product argument requires m >= 2"));
            }
            let hadamard_statement = HadamardStatement::new(statement.c_a().clone(), c_b.clone(), statement.n());
            let hadamard_result = hadamard_argument::verify(&hadamard_statement, hadamard_argument, ck)?;
            if !hadamard_result.is_verified() {
                return Ok(hadamard_result);
            }
            let svpa_statement = SingleValueProductStatement::new(c_b.clone(), statement.b().clone())?;
            single_value_product_argument::verify(&svpa_statement, single_vpa, ck)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::get_verifiable_commitment_key;
    use crate::group::params::GqGroup;
    use num_bigint::BigUint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn setup(n: usize) -> (Arc<GqGroup>, Arc<ZqGroup>, CommitmentKey) {
        let group = Arc::new(GqGroup::new(BigUint::from(23u32), BigUint::from(11u32), BigUint::from(6u32)).unwrap());
        let zq = Arc::new(group.exponent_group());
        let ck = get_verifiable_commitment_key(n, group.clone()).unwrap();
        (group, zq, ck)
    }

    #[test]
    fn single_column_delegates_to_svpa() {
        let (_g, zq, ck) = setup(2);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let a = GroupMatrix::from_columns(vec![vec![ZqElement::from_u64(3, zq.clone()), ZqElement::from_u64(5, zq.clone())]]).unwrap();
        let r = GroupVector::new(vec![ZqElement::from_u64(2, zq.clone())]).unwrap();
        let witness = ProductWitness::new(a.clone(), r.clone()).unwrap();
        let c_a = get_commitment_matrix(&a, &r, &ck).unwrap();
        let product = ZqElement::from_u64(15, zq.clone());
        let statement = ProductStatement::new(c_a, product, 2);

        let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
        assert!(matches!(argument, ProductArgument::Single(_)));
        let result = verify(&statement, &argument, &ck).unwrap();
        assert_eq!(result, VerificationResult::Verified);
    }

    #[test]
    fn two_columns_composes_hadamard_and_svpa() {
        let (_g, zq, ck) = setup(2);
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let col0 = vec![ZqElement::from_u64(2, zq.clone()), ZqElement::from_u64(3, zq.clone())];
        let col1 = vec![ZqElement::from_u64(4, zq.clone()), ZqElement::from_u64(5, zq.clone())];
        let a = GroupMatrix::from_columns(vec![col0, col1]).unwrap();
        let r = GroupVector::new(vec![ZqElement::from_u64(1, zq.clone()), ZqElement::from_u64(6, zq.clone())]).unwrap();
        let witness = ProductWitness::new(a.clone(), r.clone()).unwrap();
        let c_a = get_commitment_matrix(&a, &r, &ck).unwrap();
        // row products: row0 = 2*4=8, row1=3*5=15; total = 8*15=120 mod 11 = 10
        let total = ZqElement::from_u64(120 % 11, zq.clone());
        let statement = ProductStatement::new(c_a, total, 2);

        let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
        assert!(matches!(argument, ProductArgument::Composed { .. }));
        let result = verify(&statement, &argument, &ck).unwrap();
        assert_eq!(result, VerificationResult::Verified);
    }

    #[test]
    fn composed_argument_rejects_mismatched_total_product() {
        let (_g, zq, ck) = setup(2);
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let col0 = vec![ZqElement::from_u64(2, zq.clone()), ZqElement::from_u64(3, zq.clone())];
        let col1 = vec![ZqElement::from_u64(4, zq.clone()), ZqElement::from_u64(5, zq.clone())];
        let a = GroupMatrix::from_columns(vec![col0, col1]).unwrap();
        let r = GroupVector::new(vec![ZqElement::from_u64(1, zq.clone()), ZqElement::from_u64(6, zq.clone())]).unwrap();
        let witness = ProductWitness::new(a.clone(), r.clone()).unwrap();
        let c_a = get_commitment_matrix(&a, &r, &ck).unwrap();
        // Real total is 10 (see two_columns_composes_hadamard_and_svpa); claim 1 instead.
        let wrong_total = ZqElement::from_u64(1, zq.clone());
        let statement = ProductStatement::new(c_a, wrong_total, 2);

        let argument = prove(&statement, &witness, &ck, &mut rng).unwrap();
        let result = verify(&statement, &argument, &ck).unwrap();
        assert!(!result.is_verified());
    }
}
