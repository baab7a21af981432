use super::TableError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Defines the interface for reading delimited tables into landscape models.
///
/// Implementors carry their own parsing options (delimiter, column names) and produce
/// a single model per table.
pub trait DelimitedTable {
    /// The model produced from a table.
    type Output;

    /// Reads a table from any reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source of the delimited text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed table of the expected shape.
    fn read_from(&self, reader: impl Read) -> Result<Self::Output, TableError>;

    /// Reads a table from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Output, TableError> {
        let file = File::open(path)?;
        self.read_from(BufReader::new(file))
    }
}
