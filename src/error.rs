use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for corpus joining, reference-table loading and output failures.
///
/// Every variant is fatal for a pipeline run. Emoji tokens that match neither
/// reference table are not errors; they are tallied in the run summary.
#[derive(Debug, Error)]
pub enum HeuristicsError {
    #[error("source table '{}' has no identifier column '{column}'", path.display())]
    MissingKeyColumn { path: PathBuf, column: String },
    #[error("source table '{}' has no text column '{column}'", path.display())]
    MissingTextColumn { path: PathBuf, column: String },
    #[error("reference table '{}' could not be loaded: {reason}", path.display())]
    ReferenceLoad { path: PathBuf, reason: String },
    #[error(
        "composite key '{key}' appears in both '{}' and '{}'",
        first.display(),
        second.display()
    )]
    DuplicateCompositeKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("no '{file_name}' tables found under '{}'", root.display())]
    EmptyCorpus { root: PathBuf, file_name: String },
    #[error("table '{}' could not be read: {source}", path.display())]
    TableRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("table '{}' could not be written: {source}", path.display())]
    TableWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("configuration file '{}' could not be loaded: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HeuristicsError>;

impl From<walkdir::Error> for HeuristicsError {
    fn from(err: walkdir::Error) -> Self {
        HeuristicsError::Io(err.into())
    }
}
