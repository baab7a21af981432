use super::TableError;
use super::traits::DelimitedTable;
use crate::core::models::labels::CategoryLabels;
use std::io::Read;
use tracing::{debug, warn};

pub const DEFAULT_ID_COLUMN: &str = "Sequence_ID";
pub const DEFAULT_CATEGORY_COLUMN: &str = "Lineage";

/// Reads a metadata table with a header row into [`CategoryLabels`].
///
/// Only the identifier and category columns are consulted; all other columns are ignored.
/// Rows with an empty identifier or category are skipped with a warning. An identifier
/// listed twice with different categories is an error.
#[derive(Debug, Clone)]
pub struct LabelTableReader {
    pub id_column: String,
    pub category_column: String,
    pub delimiter: u8,
}

impl Default for LabelTableReader {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

impl LabelTableReader {
    pub fn new(id_column: impl Into<String>, category_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            category_column: category_column.into(),
            ..Self::default()
        }
    }

    fn column_position(header: &csv::StringRecord, name: &str) -> Result<usize, TableError> {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }
}

impl DelimitedTable for LabelTableReader {
    type Output = CategoryLabels;

    fn read_from(&self, reader: impl Read) -> Result<CategoryLabels, TableError> {
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
        let id_pos = Self::column_position(&header, &self.id_column)?;
        let category_pos = Self::column_position(&header, &self.category_column)?;

        let mut labels = CategoryLabels::new();
        let mut skipped = 0usize;
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let identifier = record.get(id_pos).unwrap_or_default();
            let category = record.get(category_pos).unwrap_or_default();
            if identifier.is_empty() || category.is_empty() {
                skipped += 1;
                continue;
            }
            labels
                .try_insert(identifier, category)
                .map_err(|existing| TableError::ConflictingLabel {
                    identifier: identifier.to_string(),
                    existing,
                    conflicting: category.to_string(),
                })?;
            debug!(row, identifier, category, "Read label.");
        }

        if skipped > 0 {
            warn!(
                skipped,
                "Skipped metadata rows with an empty identifier or category."
            );
        }
        Ok(labels)
    }
}
