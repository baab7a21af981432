use super::config::ConfigError;
use crate::core::io::TableError;
use crate::core::models::matrix::MatrixError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("Failed to read table: {source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error(
        "Insufficient data: {entities} entities cannot define a stable {dimensions}-dimensional embedding (at least {required} required)"
    )]
    InsufficientData {
        entities: usize,
        dimensions: usize,
        required: usize,
    },

    #[error(
        "Label assigns identifier '{identifier}' to category '{category}', but the identifier is absent from the embedding"
    )]
    UnknownCategory {
        identifier: String,
        category: String,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
