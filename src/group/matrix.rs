//! `GroupMatrix<T>`: a runtime m×n matrix of group elements, stored
//! row-major.
//!
//! Bayer-Groth reshapes an N-length vector into an m×n matrix chosen to
//! minimize `m + n` (see [`crate::matrix_utils::matrix_dimensions`]), then
//! commits to it column by column. Either both dimensions are at least 1,
//! or the matrix is the unique 0×0 matrix; a 0×n or m×0 matrix with the
//! other dimension nonzero can't arise from that construction and isn't a
//! value this type can hold.

use crate::error::{CryptoError, CryptoResult};
use crate::group::element::GroupElem;

#[derive(Clone, Debug)]
pub struct GroupMatrix<T: GroupElem> {
    rows: usize,
    columns: usize,
    /// Row-major: `data[row * columns + column]`.
    data: Vec<T>,
    group: T::Group,
}

impl<T: GroupElem> GroupMatrix<T> {
    /// Builds a matrix from a list of rows, each the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> CryptoResult<Self> {
        if rows.is_empty() {
            return Err(CryptoError::invalid("GroupMatrix::from_rows requires at least one row"));
        }
        let columns = rows[0].len();
        if columns == 0 {
            return Err(CryptoError::invalid("GroupMatrix rows must be non-empty"));
        }
        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * columns);
        let group = rows[0][0].group().clone();
        for row in rows {
            if row.len() != columns {
                return Err(CryptoError::invalid("all rows of a GroupMatrix must have equal length"));
            }
            for e in row {
                if e.group() != &group {
                    return Err(CryptoError::invalid(
                        "all elements of a GroupMatrix must share one group",
                    ));
                }
                data.push(e);
            }
        }
        Ok(GroupMatrix {
            rows: num_rows,
            columns,
            data,
            group,
        })
    }

    /// Builds a matrix from a list of columns, each the same length.
    pub fn from_columns(columns: Vec<Vec<T>>) -> CryptoResult<Self> {
        if columns.is_empty() {
            return Err(CryptoError::invalid("GroupMatrix::from_columns requires at least one column"));
        }
        let rows = columns[0].len();
        if rows == 0 {
            return Err(CryptoError::invalid("GroupMatrix columns must be non-empty"));
        }
        let num_columns = columns.len();
        for c in &columns {
            if c.len() != rows {
                return Err(CryptoError::invalid("all columns of a GroupMatrix must have equal length"));
            }
        }
        let group = columns[0][0].group().clone();
        let mut data: Vec<Option<T>> = (0..rows * num_columns).map(|_| None).collect();
        for (col_idx, col) in columns.into_iter().enumerate() {
            for (row_idx, e) in col.into_iter().enumerate() {
                if e.group() != &group {
                    return Err(CryptoError::invalid(
                        "all elements of a GroupMatrix must share one group",
                    ));
                }
                data[row_idx * num_columns + col_idx] = Some(e);
            }
        }
        let data = data
            .into_iter()
            .map(|e| e.expect("every cell filled by construction"))
            .collect();
        Ok(GroupMatrix {
            rows,
            columns: num_columns,
            data,
            group,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    pub fn group(&self) -> &T::Group {
        &self.group
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.data.get(row * self.columns + column)
    }

    pub fn get_row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.data[start..start + self.columns])
    }

    pub fn get_column(&self, column: usize) -> Option<Vec<&T>> {
        if column >= self.columns {
            return None;
        }
        Some((0..self.rows).map(|r| &self.data[r * self.columns + column]).collect())
    }

    /// Iterates rows, each as a slice.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |r| &self.data[r * self.columns..(r + 1) * self.columns])
    }

    /// Iterates columns, each materialized as a `Vec` of references.
    pub fn columns(&self) -> impl Iterator<Item = Vec<&T>> + '_ {
        (0..self.columns).map(move |c| (0..self.rows).map(move |r| &self.data[r * self.columns + c]).collect())
    }

    /// Flattened row-major iteration over every cell.
    pub fn stream(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T: GroupElem + PartialEq> PartialEq for GroupMatrix<T>
where
    T::Group: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns && self.group == other.group && self.data == other.data
    }
}

impl<T: GroupElem + Eq> Eq for GroupMatrix<T> where T::Group: Eq {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::element::ZqElement;
    use crate::group::params::ZqGroup;
    use num_bigint::BigUint;
    use std::sync::Arc;

    fn group() -> Arc<ZqGroup> {
        Arc::new(ZqGroup::new(BigUint::from(23u32)))
    }

    fn elem(v: u64, g: &Arc<ZqGroup>) -> ZqElement {
        ZqElement::from_u64(v, g.clone())
    }

    #[test]
    fn from_rows_then_get() {
        let g = group();
        let m = GroupMatrix::from_rows(vec![
            vec![elem(1, &g), elem(2, &g), elem(3, &g)],
            vec![elem(4, &g), elem(5, &g), elem(6, &g)],
        ])
        .unwrap();
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.num_columns(), 3);
        assert_eq!(m.get(1, 2).unwrap().value(), &BigUint::from(6u32));
        assert_eq!(m.get_row(0).unwrap().len(), 3);
    }

    #[test]
    fn from_rows_and_from_columns_agree() {
        let g = group();
        let by_rows = GroupMatrix::from_rows(vec![
            vec![elem(1, &g), elem(2, &g)],
            vec![elem(3, &g), elem(4, &g)],
        ])
        .unwrap();
        let by_columns = GroupMatrix::from_columns(vec![
            vec![elem(1, &g), elem(3, &g)],
            vec![elem(2, &g), elem(4, &g)],
        ])
        .unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(by_rows.get(r, c), by_columns.get(r, c));
            }
        }
    }

    #[test]
    fn rejects_ragged_rows() {
        let g = group();
        let m = GroupMatrix::from_rows(vec![vec![elem(1, &g), elem(2, &g)], vec![elem(3, &g)]]);
        assert!(m.is_err());
    }

    #[test]
    fn get_column_reads_down_a_column() {
        let g = group();
        let m = GroupMatrix::from_rows(vec![
            vec![elem(1, &g), elem(2, &g)],
            vec![elem(3, &g), elem(4, &g)],
        ])
        .unwrap();
        let col = m.get_column(1).unwrap();
        assert_eq!(col[0].value(), &BigUint::from(2u32));
        assert_eq!(col[1].value(), &BigUint::from(4u32));
    }
}
