use std::path::PathBuf;
use structparity::core::io::corpus::CorpusError;
use structparity::core::io::snapshot::SourceConfigError;
use structparity::engine::error::BatchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Source(#[from] SourceConfigError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("{failed} of {total} entries failed the comparison")]
    Failures { failed: usize, total: usize },

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write report '{path}': {source}", path = path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
