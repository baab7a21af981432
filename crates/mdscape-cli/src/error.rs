use mdscape::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A matrix, metadata, config or output table that could not be read or written.
    #[error("Cannot process table '{path}': {source}", path = path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Cannot configure worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Embedding worker stopped abnormally: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
