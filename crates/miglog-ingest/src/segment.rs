//! Step segmentation of a migration run log.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use miglog_model::LogStep;

/// Matches a step boundary marker. The name is captured on a single line and
/// may contain anything except `]`; it is taken verbatim, untrimmed.
static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[step: ([^\]\n]+)\]").expect("Invalid step marker regex"));

struct Marker<'a> {
    name: &'a str,
    start: usize,
    end: usize,
}

/// Splits a run log into per-step sections.
///
/// Every `[step: <name>]` marker opens a section whose body runs from just
/// after the marker to the start of the next marker, or to the end of the
/// log. Sections are contiguous and non-overlapping, in log order; the first
/// marker occurrence always wins, so a marker-shaped string quoted inside a
/// message still truncates the enclosing body. Text before the first marker
/// belongs to no step, and a log without markers yields no steps. Nothing
/// here can fail.
pub fn segment(log: &str) -> Vec<LogStep> {
    let markers: Vec<Marker<'_>> = STEP_MARKER
        .captures_iter(log)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let name = captures.get(1)?;
            Some(Marker {
                name: name.as_str(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect();

    let mut steps = Vec::with_capacity(markers.len());
    for (index, marker) in markers.iter().enumerate() {
        let body_end = markers.get(index + 1).map_or(log.len(), |next| next.start);
        steps.push(LogStep::new(marker.name, &log[marker.end..body_end]));
    }
    debug!(steps = steps.len(), "segmented migration log");
    steps
}
