//! Tabular input/output for dissimilarity landscapes.
//!
//! The embedding engine itself never touches files. This module provides the thin
//! ingestion and export layer around it: reading a row/column-labelled dissimilarity
//! table and a metadata table mapping identifiers to categories, and writing the
//! coordinate and dispersion summary tables consumed by downstream report layers.

pub mod labels;
pub mod matrix;
pub mod output;
pub mod traits;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table is empty: no header row found")]
    MissingHeader,

    #[error("Column '{0}' not found in table header")]
    MissingColumn(String),

    #[error("Row {row} ('{identifier}') has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        identifier: String,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, column '{column}': cannot parse '{value}' as a number")]
    ParseValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row and column identifiers differ: {0}")]
    IdentifierMismatch(String),

    #[error("Identifier '{0}' appears more than once")]
    DuplicateIdentifier(String),

    #[error("Identifier '{identifier}' is labelled both '{existing}' and '{conflicting}'")]
    ConflictingLabel {
        identifier: String,
        existing: String,
        conflicting: String,
    },
}
