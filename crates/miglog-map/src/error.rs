//! Error types for mapping-document operations.

use std::path::PathBuf;
use thiserror::Error;

use miglog_model::ErrorKind;

use crate::document::RuleList;

/// Errors that can occur while loading, patching, or writing mapping
/// documents. All of them abort the run; a half-patched set of documents
/// must never reach disk.
#[derive(Debug, Error)]
pub enum MapError {
    /// Mapping document could not be read.
    #[error("failed to read mapping document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mapping document could not be written back.
    #[error("failed to write mapping document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mapping document is not well-formed XML.
    #[error("invalid XML in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Mapping document could not be serialized.
    #[error("failed to serialize mapping document {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    /// A required rule-list anchor is missing from the document.
    #[error("{path} has no {anchor} list")]
    MissingAnchor { path: PathBuf, anchor: RuleList },

    /// A field-kind record arrived without its owning document name.
    #[error("{kind} record carries no document name")]
    MissingFieldDocument { kind: ErrorKind },
}

/// Result type alias for mapping-document operations.
pub type Result<T> = std::result::Result<T, MapError>;

impl MapError {
    /// Create a Read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a Write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a Parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a Serialize error.
    pub fn serialize(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Serialize {
            path: path.into(),
            message: message.into(),
        }
    }
}
