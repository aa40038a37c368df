use serde::{Deserialize, Serialize};
use std::fmt;

/// One pipeline phase of a migration run, as delimited in the run log.
///
/// `body` holds the raw log text between this step's `[step: <name>]` marker
/// and the next marker (or the end of the log), newlines included. Neither
/// field is normalized; downstream matching works on the text as logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStep {
    pub name: String,
    pub body: String,
}

impl LogStep {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// The four "not mapped" failure shapes a migration run reports.
///
/// Document kinds name whole documents (tables); field kinds name fields
/// within a single document. Source and destination refer to the two sides of
/// the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SourceDocument,
    SourceField,
    DestinationDocument,
    DestinationField,
}

impl ErrorKind {
    /// All kinds in processing order: source documents, source fields,
    /// destination documents, destination fields. The run driver walks this
    /// array, so output order is independent of how errors appear in a log.
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::SourceDocument,
        ErrorKind::SourceField,
        ErrorKind::DestinationDocument,
        ErrorKind::DestinationField,
    ];

    /// True for the two kinds whose records carry an owning document name.
    pub fn is_field_kind(&self) -> bool {
        matches!(self, ErrorKind::SourceField | ErrorKind::DestinationField)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SourceDocument => "source documents",
            ErrorKind::SourceField => "source fields",
            ErrorKind::DestinationDocument => "destination documents",
            ErrorKind::DestinationField => "destination fields",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One classified failure extracted from a step body.
///
/// `document` is present only for field kinds. `entities` preserves the
/// extracted list order; duplicates are kept because every occurrence in the
/// log produces its own ignore rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub entities: Vec<String>,
}

impl ErrorRecord {
    /// Record for a document kind: a list of unmapped document names.
    pub fn documents(kind: ErrorKind, entities: Vec<String>) -> Self {
        Self {
            kind,
            document: None,
            entities,
        }
    }

    /// Record for a field kind: unmapped fields within one document.
    pub fn fields(kind: ErrorKind, document: impl Into<String>, entities: Vec<String>) -> Self {
        Self {
            kind,
            document: Some(document.into()),
            entities,
        }
    }
}
