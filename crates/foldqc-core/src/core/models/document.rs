use serde::Deserialize;
use thiserror::Error;

/// The confidence report written by a structure-prediction job.
///
/// Both payloads are optional in the input format. A document that carries
/// neither is still valid; it simply produces no artifacts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfidenceDocument {
    /// Per-atom confidence scores (pLDDT), nominally in `[0, 100]`.
    #[serde(rename = "atom_plddts", default)]
    pub atom_confidences: Option<Vec<f64>>,
    /// Predicted aligned error rows in Ångströms, as stored in the document.
    ///
    /// Squareness is not enforced at load time; see [`SquareMatrix::from_rows`].
    #[serde(rename = "pae", default)]
    pub pairwise_error: Option<Vec<Vec<f64>>>,
}

impl ConfidenceDocument {
    pub fn has_atom_confidences(&self) -> bool {
        self.atom_confidences.is_some()
    }

    pub fn has_pairwise_error(&self) -> bool {
        self.pairwise_error.is_some()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Pairwise error matrix is empty")]
    Empty,
    #[error("Pairwise error matrix is not square: row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// An `N x N` matrix stored row-major in a single buffer.
///
/// Symmetry is not required. Row `i` is the aligned residue, column `j` the
/// scored residue.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    /// Checks that `rows` form a non-empty square matrix and returns its
    /// dimension, without copying any cells.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Empty`] for zero rows and
    /// [`MatrixError::NotSquare`] for the first row whose length differs from
    /// the row count.
    pub fn check_shape(rows: &[Vec<f64>]) -> Result<usize, MatrixError> {
        let dim = rows.len();
        if dim == 0 {
            return Err(MatrixError::Empty);
        }
        match rows.iter().position(|cells| cells.len() != dim) {
            Some(row) => Err(MatrixError::NotSquare {
                row,
                expected: dim,
                found: rows[row].len(),
            }),
            None => Ok(dim),
        }
    }

    /// Validates and flattens raw rows. Fails as [`Self::check_shape`] does.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let dim = Self::check_shape(rows)?;
        let mut values = Vec::with_capacity(dim * dim);
        for cells in rows {
            values.extend_from_slice(cells);
        }
        Ok(Self { dim, values })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.dim + col]
    }

    /// Returns `(min, max)` over all cells.
    pub fn value_range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_both_fields() {
        let doc: ConfidenceDocument =
            serde_json::from_str(r#"{"atom_plddts": [90.0, 80.5], "pae": [[0.0, 1.0], [2.0, 0.0]]}"#)
                .unwrap();
        assert_eq!(doc.atom_confidences, Some(vec![90.0, 80.5]));
        assert_eq!(
            doc.pairwise_error,
            Some(vec![vec![0.0, 1.0], vec![2.0, 0.0]])
        );
    }

    #[test]
    fn missing_fields_are_absent_not_errors() {
        let doc: ConfidenceDocument = serde_json::from_str(r#"{"token_chain_ids": ["A"]}"#).unwrap();
        assert!(!doc.has_atom_confidences());
        assert!(!doc.has_pairwise_error());
    }

    #[test]
    fn empty_score_list_is_present() {
        let doc: ConfidenceDocument = serde_json::from_str(r#"{"atom_plddts": []}"#).unwrap();
        assert_eq!(doc.atom_confidences, Some(vec![]));
    }

    #[test]
    fn integer_values_are_accepted_as_floats() {
        let doc: ConfidenceDocument = serde_json::from_str(r#"{"atom_plddts": [90, 80, 70]}"#).unwrap();
        assert_eq!(doc.atom_confidences, Some(vec![90.0, 80.0, 70.0]));
    }

    #[test]
    fn square_matrix_accepts_asymmetric_input() {
        let m = SquareMatrix::from_rows(&[vec![0.0, 5.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(0, 1), 5.0);
        assert_eq!(m.get(1, 0), 1.0);
        assert_eq!(m.value_range(), (0.0, 5.0));
    }

    #[test]
    fn square_matrix_rejects_empty() {
        assert_eq!(SquareMatrix::from_rows(&[]), Err(MatrixError::Empty));
    }

    #[test]
    fn square_matrix_rejects_ragged_rows() {
        let result = SquareMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]);
        assert_eq!(
            result,
            Err(MatrixError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn square_matrix_rejects_rectangular() {
        let result = SquareMatrix::from_rows(&[vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 2.0]]);
        assert!(matches!(result, Err(MatrixError::NotSquare { row: 0, .. })));
    }

    #[test]
    fn check_shape_returns_dimension_without_copying() {
        let rows = vec![vec![0.0; 3]; 3];
        assert_eq!(SquareMatrix::check_shape(&rows), Ok(3));
        assert_eq!(
            SquareMatrix::check_shape(&[vec![0.0, 1.0, 2.0], vec![1.0]]),
            Err(MatrixError::NotSquare {
                row: 0,
                expected: 2,
                found: 3
            })
        );
    }
}
