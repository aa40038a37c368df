use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors raised while locating or reading a migration run log.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("migration log not found: {path}")]
    LogNotFound { path: PathBuf },

    #[error("failed to read migration log {path}: {source}")]
    LogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
