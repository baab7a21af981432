use itertools::Itertools;
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default tolerance for the symmetry and zero-diagonal checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// The structural invariant a rejected matrix violated.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Empty,
    NotSquare { row: usize, len: usize },
    IdentifierCount { identifiers: usize },
    DuplicateIdentifier { identifier: String, first: usize, second: usize },
    NonZeroDiagonal { index: usize, value: f64, tolerance: f64 },
    Asymmetric { row: usize, column: usize, upper: f64, lower: f64, tolerance: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Empty => write!(f, "matrix has no rows"),
            Violation::NotSquare { row, len } => {
                write!(f, "row {} has {} entries, matrix is not square", row, len)
            }
            Violation::IdentifierCount { identifiers } => {
                write!(f, "{} identifiers supplied", identifiers)
            }
            Violation::DuplicateIdentifier {
                identifier,
                first,
                second,
            } => write!(
                f,
                "identifier '{}' appears at indices {} and {}",
                identifier, first, second
            ),
            Violation::NonZeroDiagonal {
                index,
                value,
                tolerance,
            } => write!(
                f,
                "diagonal entry [{}][{}] = {} exceeds tolerance {}",
                index, index, value, tolerance
            ),
            Violation::Asymmetric {
                row,
                column,
                upper,
                lower,
                tolerance,
            } => write!(
                f,
                "entries [{}][{}] = {} and [{}][{}] = {} differ by more than {}",
                row, column, upper, column, row, lower, tolerance
            ),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Malformed {dimension}x{dimension} dissimilarity matrix: {violation}")]
    Malformed {
        dimension: usize,
        violation: Violation,
    },

    #[error(
        "Invalid value {value} at [{row}][{column}] of {dimension}x{dimension} dissimilarity matrix: entries must be finite and non-negative"
    )]
    InvalidValue {
        dimension: usize,
        row: usize,
        column: usize,
        value: f64,
    },
}

/// A validated, immutable N×N dissimilarity matrix indexed by unique identifiers.
///
/// Construction goes through [`DissimilarityMatrix::validate`], which guarantees that the
/// stored matrix is exactly symmetric, has an exactly zero diagonal, and holds only
/// finite, non-negative entries. The triangle inequality is not required.
#[derive(Debug, Clone, PartialEq)]
pub struct DissimilarityMatrix {
    values: DMatrix<f64>,
    identifiers: Arc<[String]>,
    index: Arc<HashMap<String, usize>>,
}

impl DissimilarityMatrix {
    /// Validates a row-major matrix against the dissimilarity contract.
    ///
    /// # Arguments
    ///
    /// * `rows` - The raw matrix, one `Vec` per row.
    /// * `identifiers` - One unique identifier per row, in row order.
    /// * `tolerance` - Maximum allowed asymmetry and diagonal deviation.
    ///
    /// # Return
    ///
    /// The canonical matrix: symmetrized by averaging with its transpose, diagonal zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Malformed`] for structural violations (empty, not square,
    /// identifier mismatch, non-zero diagonal, asymmetry) and [`MatrixError::InvalidValue`]
    /// for NaN, infinite or negative entries.
    pub fn validate(
        rows: Vec<Vec<f64>>,
        identifiers: Vec<String>,
        tolerance: f64,
    ) -> Result<Self, MatrixError> {
        let n = rows.len();
        if n == 0 {
            return Err(MatrixError::Malformed {
                dimension: 0,
                violation: Violation::Empty,
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(MatrixError::Malformed {
                dimension: n,
                violation: Violation::NotSquare { row, len: r.len() },
            });
        }
        let values = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
        Self::validate_matrix(values, identifiers, tolerance)
    }

    /// Validates an already-square `DMatrix`. See [`DissimilarityMatrix::validate`].
    #[instrument(level = "debug", skip_all, fields(n = values.nrows()))]
    pub fn validate_matrix(
        values: DMatrix<f64>,
        identifiers: Vec<String>,
        tolerance: f64,
    ) -> Result<Self, MatrixError> {
        let n = values.nrows();
        let malformed = |violation| MatrixError::Malformed {
            dimension: n,
            violation,
        };

        if n == 0 {
            return Err(malformed(Violation::Empty));
        }
        if values.ncols() != n {
            return Err(malformed(Violation::NotSquare {
                row: 0,
                len: values.ncols(),
            }));
        }
        if identifiers.len() != n {
            return Err(malformed(Violation::IdentifierCount {
                identifiers: identifiers.len(),
            }));
        }

        let mut index = HashMap::with_capacity(n);
        for (i, id) in identifiers.iter().enumerate() {
            if let Some(&first) = index.get(id) {
                return Err(malformed(Violation::DuplicateIdentifier {
                    identifier: id.clone(),
                    first,
                    second: i,
                }));
            }
            index.insert(id.clone(), i);
        }

        for i in 0..n {
            for j in 0..n {
                let value = values[(i, j)];
                if !value.is_finite() || value < 0.0 {
                    return Err(MatrixError::InvalidValue {
                        dimension: n,
                        row: i,
                        column: j,
                        value,
                    });
                }
            }
        }

        for i in 0..n {
            let value = values[(i, i)];
            if value > tolerance {
                return Err(malformed(Violation::NonZeroDiagonal {
                    index: i,
                    value,
                    tolerance,
                }));
            }
        }

        let mut max_asymmetry = 0.0f64;
        for i in 0..n {
            for j in (i + 1)..n {
                let (upper, lower) = (values[(i, j)], values[(j, i)]);
                let asymmetry = (upper - lower).abs();
                if asymmetry > tolerance {
                    return Err(malformed(Violation::Asymmetric {
                        row: i,
                        column: j,
                        upper,
                        lower,
                        tolerance,
                    }));
                }
                max_asymmetry = max_asymmetry.max(asymmetry);
            }
        }

        let mut canonical = (&values + values.transpose()) * 0.5;
        canonical.fill_diagonal(0.0);

        debug!(n, max_asymmetry, "Dissimilarity matrix validated.");
        Ok(Self {
            values: canonical,
            identifiers: identifiers.into(),
            index: Arc::new(index),
        })
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    pub(crate) fn shared_identifiers(&self) -> (Arc<[String]>, Arc<HashMap<String, usize>>) {
        (Arc::clone(&self.identifiers), Arc::clone(&self.index))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Sum of squared dissimilarities over the upper triangle.
    pub fn sum_of_squares(&self) -> f64 {
        let n = self.len();
        (0..n)
            .tuple_combinations()
            .map(|(i, j)| self.values[(i, j)].powi(2))
            .sum()
    }

    /// Mean off-diagonal dissimilarity, or 0 for a single entity.
    pub fn mean_dissimilarity(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let pairs = (n * (n - 1) / 2) as f64;
        (0..n)
            .tuple_combinations()
            .map(|(i, j)| self.values[(i, j)])
            .sum::<f64>()
            / pairs
    }

    /// Returns a copy with every entry multiplied by `factor`.
    ///
    /// A negative or non-finite factor yields [`MatrixError::InvalidValue`].
    pub fn scaled(&self, factor: f64) -> Result<Self, MatrixError> {
        let scaled = &self.values * factor;
        if let Some((row, column, value)) = scaled
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
            .map(|(k, v)| (k % self.len(), k / self.len(), *v))
        {
            return Err(MatrixError::InvalidValue {
                dimension: self.len(),
                row,
                column,
                value,
            });
        }
        Ok(Self {
            values: scaled,
            identifiers: self.identifiers.clone(),
            index: self.index.clone(),
        })
    }
}
