//! Classification of "not mapped" errors inside a step body.
//!
//! The migration tool reports four failure shapes, each on its own log line
//! with a fixed introductory phrase. Phrase matching is case insensitive, but
//! the [`ERROR_MARKER`] gate that decides whether a step is looked at in the
//! first place is not.

use std::sync::LazyLock;

use regex::Regex;

use miglog_model::{ErrorKind, ErrorRecord, LogStep};

/// Substring that gates classification, matched case sensitively.
pub const ERROR_MARKER: &str = "ERROR";

/// Comma-separated identifier list. Items may be padded with spaces or tabs
/// and may be empty (doubled or trailing commas), but the list never crosses
/// a line break and never swallows prose following it on the same line.
const NAME_LIST: &str = r"[A-Za-z0-9_]+(?:[ \t]*,[ \t]*[A-Za-z0-9_]*)*";

static SOURCE_DOCUMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\[ERROR\]: Source documents are not mapped\. (?<names>{NAME_LIST})"
    ))
    .expect("Invalid source documents regex")
});

static SOURCE_FIELDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\[ERROR\]: Source fields are not mapped\. Document: (?<document>[^.]+?)\. Fields: (?<names>{NAME_LIST})"
    ))
    .expect("Invalid source fields regex")
});

static DESTINATION_DOCUMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\[ERROR\]: Destination documents are not mapped\. (?<names>{NAME_LIST})"
    ))
    .expect("Invalid destination documents regex")
});

static DESTINATION_FIELDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\[ERROR\]: Destination fields are not mapped\. Document: (?<document>[^.]+?)\. Fields: (?<names>{NAME_LIST})"
    ))
    .expect("Invalid destination fields regex")
});

/// True when a step body contains the error marker.
pub fn has_error_marker(body: &str) -> bool {
    body.contains(ERROR_MARKER)
}

/// Runs the extraction rule for one kind over a step body.
///
/// Produces one record per phrase occurrence, in occurrence order. Entity
/// lists are split on commas with surrounding whitespace trimmed and empty
/// items dropped; occurrences whose list comes out empty produce no record.
/// Field-kind records carry the owning document name, trimmed.
pub fn extract(body: &str, kind: ErrorKind) -> Vec<ErrorRecord> {
    let pattern: &Regex = match kind {
        ErrorKind::SourceDocument => &SOURCE_DOCUMENTS,
        ErrorKind::SourceField => &SOURCE_FIELDS,
        ErrorKind::DestinationDocument => &DESTINATION_DOCUMENTS,
        ErrorKind::DestinationField => &DESTINATION_FIELDS,
    };

    let mut records = Vec::new();
    for captures in pattern.captures_iter(body) {
        let Some(names) = captures.name("names") else {
            continue;
        };
        let entities = split_entity_list(names.as_str());
        if entities.is_empty() {
            continue;
        }
        let record = if kind.is_field_kind() {
            let Some(document) = captures.name("document") else {
                continue;
            };
            ErrorRecord::fields(kind, document.as_str().trim(), entities)
        } else {
            ErrorRecord::documents(kind, entities)
        };
        records.push(record);
    }
    records
}

/// Classifies a whole step: the marker gate first, then the four extraction
/// rules in [`ErrorKind::ALL`] order. A body without the marker yields no
/// records regardless of its content; the caller decides how to report that.
pub fn classify(step: &LogStep) -> Vec<ErrorRecord> {
    if !has_error_marker(&step.body) {
        return Vec::new();
    }
    let mut records = Vec::new();
    for kind in ErrorKind::ALL {
        records.extend(extract(&step.body, kind));
    }
    records
}

fn split_entity_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_list_splitting_trims_and_drops_empties() {
        assert_eq!(
            split_entity_list("a, b\t,c"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(split_entity_list("a,,b,"), vec!["a", "b"]);
    }
}
