//! XML mapping documents for migration triage: a document-order element
//! tree, the per-run document cache, and the ignore-rule patcher.

pub mod cache;
pub mod document;
pub mod error;
pub mod patcher;
pub mod xml;

pub use cache::{DocumentCache, FlushReport};
pub use document::{MapDocument, RuleList};
pub use error::{MapError, Result};
pub use patcher::{
    AppendOnly, DEFAULT_MAP_FILE, EAV_MAP_FILE, EAV_STEP_NAME, IgnoreAppender, IgnoreEntry,
    PatchOutcome, Patcher, ignore_entries, map_file_for_step,
};
pub use xml::{XmlDocument, XmlElement, XmlNode, parse_document};
