use super::TableError;
use super::traits::DelimitedTable;
use crate::core::models::matrix::{DissimilarityMatrix, MatrixError};
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

/// A row/column-labelled numeric table, aligned so that column `j` refers to the same
/// entity as row `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTable {
    pub identifiers: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl MatrixTable {
    /// Validates the table against the dissimilarity contract.
    pub fn into_matrix(self, tolerance: f64) -> Result<DissimilarityMatrix, MatrixError> {
        DissimilarityMatrix::validate(self.rows, self.identifiers, tolerance)
    }
}

/// Reads a labelled square table: the header holds column identifiers after a leading
/// index cell, and each record starts with its row identifier.
///
/// Columns may appear in a different order from rows; they are permuted to row order.
/// Empty cells are read as NaN so that validation reports their exact position.
#[derive(Debug, Clone, Copy)]
pub struct MatrixTableReader {
    pub delimiter: u8,
}

impl Default for MatrixTableReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DelimitedTable for MatrixTableReader {
    type Output = MatrixTable;

    fn read_from(&self, reader: impl Read) -> Result<MatrixTable, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = csv_reader.headers()?.clone();
        if header.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let columns: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

        let mut identifiers = Vec::new();
        let mut raw_rows = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let identifier = record.get(0).unwrap_or_default().to_string();
            let found = record.len().saturating_sub(1);
            if found != columns.len() {
                return Err(TableError::RowLength {
                    row,
                    identifier,
                    expected: columns.len(),
                    found,
                });
            }
            let values = record
                .iter()
                .skip(1)
                .zip(&columns)
                .map(|(cell, column)| parse_cell(cell, row, column))
                .collect::<Result<Vec<f64>, _>>()?;
            identifiers.push(identifier);
            raw_rows.push(values);
        }

        let rows = align_columns(&identifiers, &columns, raw_rows)?;
        debug!(entities = identifiers.len(), "Read labelled dissimilarity table.");
        Ok(MatrixTable { identifiers, rows })
    }
}

fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64, TableError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| TableError::ParseValue {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    })
}

fn align_columns(
    identifiers: &[String],
    columns: &[String],
    rows: Vec<Vec<f64>>,
) -> Result<Vec<Vec<f64>>, TableError> {
    let mut row_index = HashMap::with_capacity(identifiers.len());
    for (i, id) in identifiers.iter().enumerate() {
        if row_index.insert(id.as_str(), i).is_some() {
            return Err(TableError::DuplicateIdentifier(id.clone()));
        }
    }
    let mut column_index = HashMap::with_capacity(columns.len());
    for (j, id) in columns.iter().enumerate() {
        if column_index.insert(id.as_str(), j).is_some() {
            return Err(TableError::DuplicateIdentifier(id.clone()));
        }
    }

    if let Some(missing) = identifiers
        .iter()
        .find(|id| !column_index.contains_key(id.as_str()))
    {
        return Err(TableError::IdentifierMismatch(format!(
            "row '{}' has no matching column",
            missing
        )));
    }
    if let Some(missing) = columns
        .iter()
        .find(|id| !row_index.contains_key(id.as_str()))
    {
        return Err(TableError::IdentifierMismatch(format!(
            "column '{}' has no matching row",
            missing
        )));
    }

    if identifiers == columns {
        return Ok(rows);
    }

    debug!("Column order differs from row order; permuting columns.");
    let permutation: Vec<usize> = identifiers
        .iter()
        .map(|id| column_index[id.as_str()])
        .collect();
    Ok(rows
        .into_iter()
        .map(|row| permutation.iter().map(|&j| row[j]).collect())
        .collect())
}
