//! Ignore-rule patching: step routing, entry shapes, and the append itself.

use miglog_model::ErrorRecord;

use crate::cache::DocumentCache;
use crate::document::RuleList;
use crate::error::{MapError, Result};
use crate::xml::XmlElement;

/// Mapping document consumed by every migration step except the EAV one.
pub const DEFAULT_MAP_FILE: &str = "map.xml";
/// Mapping document consumed by the EAV migration step.
pub const EAV_MAP_FILE: &str = "map-eav.xml";
/// Step name that routes to [`EAV_MAP_FILE`]. The match is exact, case
/// included; any other spelling routes to the default document.
pub const EAV_STEP_NAME: &str = "EAV Step";

/// The mapping document a step's ignore rules go to. A fixed two-way
/// switch, not configuration.
pub fn map_file_for_step(step_name: &str) -> &'static str {
    if step_name == EAV_STEP_NAME {
        EAV_MAP_FILE
    } else {
        DEFAULT_MAP_FILE
    }
}

/// One ignore rule to be appended: the child tag and its text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreEntry {
    /// `<ignore><document>NAME</document></ignore>`
    Document(String),
    /// `<ignore><field>DOCUMENT.FIELD</field></ignore>`
    Field(String),
}

impl IgnoreEntry {
    pub fn tag(&self) -> &'static str {
        match self {
            IgnoreEntry::Document(_) => "document",
            IgnoreEntry::Field(_) => "field",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            IgnoreEntry::Document(value) | IgnoreEntry::Field(value) => value,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            IgnoreEntry::Document(value) | IgnoreEntry::Field(value) => value,
        }
    }
}

/// How ignore rules land in a rule list, separated out so a deduplicating
/// variant can replace the plain append without touching classification or
/// the run driver.
pub trait IgnoreAppender {
    fn append(&self, rules: &mut XmlElement, entry: &IgnoreEntry);
}

/// Appends without looking at existing rules. Re-patching an already
/// patched document therefore inserts duplicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppendOnly;

impl IgnoreAppender for AppendOnly {
    fn append(&self, rules: &mut XmlElement, entry: &IgnoreEntry) {
        let mut value = XmlElement::new(entry.tag());
        value.push_text(entry.value());
        let mut ignore = XmlElement::new("ignore");
        ignore.push_element(value);
        rules.push_element(ignore);
    }
}

/// What one [`Patcher::apply`] call appended: the routed file and the rule
/// values, in entity order.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub map_file: &'static str,
    pub values: Vec<String>,
}

/// Applies classified error records to cached mapping documents.
#[derive(Debug, Default)]
pub struct Patcher<A = AppendOnly> {
    appender: A,
}

impl Patcher<AppendOnly> {
    pub fn new() -> Self {
        Self {
            appender: AppendOnly,
        }
    }
}

impl<A: IgnoreAppender> Patcher<A> {
    pub fn with_appender(appender: A) -> Self {
        Self { appender }
    }

    /// Appends one ignore rule per entity of `record` to the right list of
    /// the right document for `step_name`. The document loads through the
    /// cache on first touch; nothing is written to disk here.
    pub fn apply(
        &self,
        cache: &mut DocumentCache,
        step_name: &str,
        record: &ErrorRecord,
    ) -> Result<PatchOutcome> {
        let map_file = map_file_for_step(step_name);
        let entries = ignore_entries(record)?;
        let document = cache.get_mut(map_file)?;
        let rules = document.rule_list_mut(RuleList::for_kind(record.kind))?;
        for entry in &entries {
            self.appender.append(rules, entry);
        }
        document.note_appended(entries.len());
        Ok(PatchOutcome {
            map_file,
            values: entries.into_iter().map(IgnoreEntry::into_value).collect(),
        })
    }
}

/// The ignore entries for one record, in entity order. Field entries join
/// the owning document and the field name with a dot.
pub fn ignore_entries(record: &ErrorRecord) -> Result<Vec<IgnoreEntry>> {
    if !record.kind.is_field_kind() {
        return Ok(record
            .entities
            .iter()
            .map(|entity| IgnoreEntry::Document(entity.clone()))
            .collect());
    }
    let document = record
        .document
        .as_deref()
        .ok_or(MapError::MissingFieldDocument { kind: record.kind })?;
    Ok(record
        .entities
        .iter()
        .map(|entity| IgnoreEntry::Field(format!("{document}.{entity}")))
        .collect())
}
