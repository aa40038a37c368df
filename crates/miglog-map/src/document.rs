//! Mapping documents and their rule-list anchors.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use miglog_model::ErrorKind;

use crate::error::{MapError, Result};
use crate::xml::{XmlDocument, XmlElement, parse_document};

/// The four ignore-rule lists of a mapping document, addressed by tag name
/// and document-order occurrence: the first `document_rules`/`field_rules`
/// list belongs to the source side, the second to the destination side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleList {
    SourceDocuments,
    SourceFields,
    DestinationDocuments,
    DestinationFields,
}

impl RuleList {
    pub const ALL: [RuleList; 4] = [
        RuleList::SourceDocuments,
        RuleList::SourceFields,
        RuleList::DestinationDocuments,
        RuleList::DestinationFields,
    ];

    /// The list an error kind's ignore rules go to.
    pub fn for_kind(kind: ErrorKind) -> RuleList {
        match kind {
            ErrorKind::SourceDocument => RuleList::SourceDocuments,
            ErrorKind::SourceField => RuleList::SourceFields,
            ErrorKind::DestinationDocument => RuleList::DestinationDocuments,
            ErrorKind::DestinationField => RuleList::DestinationFields,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            RuleList::SourceDocuments | RuleList::DestinationDocuments => "document_rules",
            RuleList::SourceFields | RuleList::DestinationFields => "field_rules",
        }
    }

    /// Which document-order occurrence of [`RuleList::tag`] holds this list.
    pub fn occurrence(&self) -> usize {
        match self {
            RuleList::SourceDocuments | RuleList::SourceFields => 0,
            RuleList::DestinationDocuments | RuleList::DestinationFields => 1,
        }
    }
}

impl fmt::Display for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self {
            RuleList::SourceDocuments | RuleList::SourceFields => "source",
            RuleList::DestinationDocuments | RuleList::DestinationFields => "destination",
        };
        write!(f, "{side} {}", self.tag())
    }
}

/// One mapping document, parsed once and held in memory for the whole run.
#[derive(Debug, Clone)]
pub struct MapDocument {
    file_name: String,
    path: PathBuf,
    document: XmlDocument,
    appended: usize,
}

impl MapDocument {
    /// Loads and validates a mapping document. All four rule-list anchors
    /// must resolve here, so a malformed document aborts the run before
    /// anything is patched or flushed.
    pub fn load(file_name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let file_name = file_name.into();
        let path = path.into();
        let xml = fs::read_to_string(&path).map_err(|e| MapError::read(&path, e))?;
        let document = parse_document(&xml).map_err(|message| MapError::parse(&path, message))?;
        let loaded = Self {
            file_name,
            path,
            document,
            appended: 0,
        };
        for anchor in RuleList::ALL {
            if loaded
                .document
                .root
                .nth_descendant(anchor.tag(), anchor.occurrence())
                .is_none()
            {
                return Err(MapError::MissingAnchor {
                    path: loaded.path,
                    anchor,
                });
            }
        }
        Ok(loaded)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &XmlElement {
        &self.document.root
    }

    /// Ignore rules appended to this document during the current run.
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// The element holding one of the four ignore-rule lists.
    pub fn rule_list(&self, list: RuleList) -> Result<&XmlElement> {
        match self
            .document
            .root
            .nth_descendant(list.tag(), list.occurrence())
        {
            Some(element) => Ok(element),
            None => Err(MapError::MissingAnchor {
                path: self.path.clone(),
                anchor: list,
            }),
        }
    }

    /// Mutable variant of [`MapDocument::rule_list`].
    pub fn rule_list_mut(&mut self, list: RuleList) -> Result<&mut XmlElement> {
        match self
            .document
            .root
            .nth_descendant_mut(list.tag(), list.occurrence())
        {
            Some(element) => Ok(element),
            None => Err(MapError::MissingAnchor {
                path: self.path.clone(),
                anchor: list,
            }),
        }
    }

    pub(crate) fn note_appended(&mut self, count: usize) {
        self.appended += count;
    }

    /// Serializes the document, pretty-printed.
    pub fn to_xml_string(&self) -> Result<String> {
        self.document
            .to_xml_string()
            .map_err(|message| MapError::serialize(&self.path, message))
    }

    /// Writes the document back to its source path, overwriting the
    /// original.
    pub fn write_back(&self) -> Result<()> {
        let xml = self.to_xml_string()?;
        fs::write(&self.path, xml).map_err(|e| MapError::write(&self.path, e))
    }
}
