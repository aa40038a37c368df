//! Migration log triage pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Read**: Load the run log into memory
//! 2. **Segment**: Split the log into `[step: ...]` sections
//! 3. **Classify**: Extract "not mapped" records per step, in fixed kind order
//! 4. **Patch**: Append `<ignore>` rules to the cached mapping documents and
//!    queue one review ticket per step and kind batch
//! 5. **Flush**: Write every touched mapping document back, exactly once
//!
//! Any read, parse, or write failure aborts before the flush stage; a run
//! never leaves a partially written document set behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use miglog_ingest::{classify, extract, has_error_marker, read_log_file, segment};
use miglog_map::{DocumentCache, Patcher, map_file_for_step};
use miglog_model::{ErrorKind, LogStep, TicketBuilder, TicketSink};

/// Where a triage run reads from and writes to.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Path of the migration run log.
    pub log_path: PathBuf,
    /// Directory holding the mapping documents.
    pub map_dir: PathBuf,
    /// Classify and patch in memory, skip the final flush.
    pub dry_run: bool,
}

/// Result of a full triage run.
#[derive(Debug)]
pub struct RunSummary {
    pub log_path: PathBuf,
    pub map_dir: PathBuf,
    pub dry_run: bool,
    /// One entry per log step, in log order.
    pub steps: Vec<StepSummary>,
    /// One entry per mapping document the run touched.
    pub documents: Vec<DocumentReport>,
    /// Tickets handed to the sink (empty batches never reach it).
    pub tickets_queued: usize,
}

/// Appended rule counts for one step, split by error kind.
#[derive(Debug)]
pub struct StepSummary {
    pub name: String,
    /// Whether the step body carried the error marker at all.
    pub has_errors: bool,
    pub source_documents: usize,
    pub source_fields: usize,
    pub destination_documents: usize,
    pub destination_fields: usize,
}

impl StepSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_errors: false,
            source_documents: 0,
            source_fields: 0,
            destination_documents: 0,
            destination_fields: 0,
        }
    }

    /// Appended rules across all four kinds.
    pub fn total(&self) -> usize {
        self.source_documents
            + self.source_fields
            + self.destination_documents
            + self.destination_fields
    }

    fn add(&mut self, kind: ErrorKind, appended: usize) {
        match kind {
            ErrorKind::SourceDocument => self.source_documents += appended,
            ErrorKind::SourceField => self.source_fields += appended,
            ErrorKind::DestinationDocument => self.destination_documents += appended,
            ErrorKind::DestinationField => self.destination_fields += appended,
        }
    }
}

/// Flush state of one mapping document at the end of a run.
#[derive(Debug)]
pub struct DocumentReport {
    pub file_name: String,
    pub path: PathBuf,
    /// Ignore rules appended during this run.
    pub appended: usize,
    /// False under `--dry-run`.
    pub written: bool,
}

/// One classified record as a `scan` would report it: where it came from and
/// where a `run` would send it.
#[derive(Debug)]
pub struct ScanRecord {
    pub step: String,
    pub kind: ErrorKind,
    pub document: Option<String>,
    pub entities: Vec<String>,
    pub map_file: &'static str,
}

/// Result of a classification-only pass over a log.
#[derive(Debug)]
pub struct ScanSummary {
    pub log_path: PathBuf,
    pub steps: usize,
    pub records: Vec<ScanRecord>,
}

/// Runs the full triage pipeline over one migration log.
///
/// The sink receives at most one ticket per step and kind. Mapping documents
/// are written back only after every step has been processed; under
/// `config.dry_run` they are reported but never written.
pub fn run_triage(config: &TriageConfig, sink: &mut dyn TicketSink) -> Result<RunSummary> {
    let run_span = info_span!("triage", log = %config.log_path.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1-2: Read and segment the run log
    // =========================================================================
    let log = read_log_file(&config.log_path).context("read migration log")?;
    let steps = segment(&log);
    info!(steps = steps.len(), "segmented migration log");

    // =========================================================================
    // Stage 3-4: Classify, patch, queue tickets - per step in log order
    // =========================================================================
    let patcher = Patcher::new();
    let mut cache = DocumentCache::new(&config.map_dir);
    let mut step_summaries = Vec::with_capacity(steps.len());
    let mut tickets_queued = 0usize;
    for step in &steps {
        let (summary, tickets) = triage_step(&patcher, &mut cache, sink, step)?;
        tickets_queued += tickets;
        step_summaries.push(summary);
    }

    // =========================================================================
    // Stage 5: Flush - write every resident document back
    // =========================================================================
    let documents = if config.dry_run {
        info!("dry run, mapping documents left untouched");
        cache
            .resident()
            .map(|document| DocumentReport {
                file_name: document.file_name().to_string(),
                path: document.path().to_path_buf(),
                appended: document.appended(),
                written: false,
            })
            .collect()
    } else {
        let reports = cache.flush_all().context("write mapping documents")?;
        for report in &reports {
            info!(
                file = %report.file_name,
                appended = report.appended,
                "wrote mapping document"
            );
        }
        reports
            .into_iter()
            .map(|report| DocumentReport {
                file_name: report.file_name,
                path: report.path,
                appended: report.appended,
                written: true,
            })
            .collect()
    };

    info!(
        steps = step_summaries.len(),
        tickets = tickets_queued,
        duration_ms = start.elapsed().as_millis(),
        "triage complete"
    );
    Ok(RunSummary {
        log_path: config.log_path.clone(),
        map_dir: config.map_dir.clone(),
        dry_run: config.dry_run,
        steps: step_summaries,
        documents,
        tickets_queued,
    })
}

/// Triages one step: the error-marker gate, then the four extraction passes
/// in [`ErrorKind::ALL`] order. Returns the step summary and the number of
/// tickets queued.
fn triage_step(
    patcher: &Patcher,
    cache: &mut DocumentCache,
    sink: &mut dyn TicketSink,
    step: &LogStep,
) -> Result<(StepSummary, usize)> {
    let step_span = info_span!("step", name = %step.name);
    let _step_guard = step_span.enter();

    let mut summary = StepSummary::new(&step.name);
    if !has_error_marker(&step.body) {
        info!("no errors found for step");
        return Ok((summary, 0));
    }
    summary.has_errors = true;
    info!("errors found in step");

    let mut tickets = 0usize;
    for kind in ErrorKind::ALL {
        let records = extract(&step.body, kind);
        if records.is_empty() {
            continue;
        }
        let entity_count: usize = records.iter().map(|record| record.entities.len()).sum();
        info!(
            kind = %kind,
            occurrences = records.len(),
            entities = entity_count,
            "unmapped entities found"
        );

        let mut builder = if kind.is_field_kind() {
            TicketBuilder::ignored_fields(&step.name)
        } else {
            TicketBuilder::ignored_documents(&step.name)
        };
        for record in &records {
            debug!(
                kind = %kind,
                document = record.document.as_deref().unwrap_or("-"),
                entities = ?record.entities,
                "appending ignore rules"
            );
            let outcome = patcher
                .apply(cache, &step.name, record)
                .with_context(|| format!("patch mapping document for step {}", step.name))?;
            summary.add(kind, outcome.values.len());
            if let Some(document) = &record.document {
                for field in &record.entities {
                    builder.push_field(document, field);
                }
            } else {
                for name in &record.entities {
                    builder.push_document(name);
                }
            }
        }
        if let Some(ticket) = builder.finish() {
            sink.queue_issue(ticket).context("queue review ticket")?;
            tickets += 1;
        }
    }
    if summary.total() == 0 {
        info!("error marker present but no unmapped entities matched");
    }
    Ok((summary, tickets))
}

/// Segments and classifies a log without touching any mapping document.
pub fn scan_log(log_path: &Path) -> Result<ScanSummary> {
    let log = read_log_file(log_path).context("read migration log")?;
    let steps = segment(&log);
    let mut records = Vec::new();
    for step in &steps {
        for record in classify(step) {
            records.push(ScanRecord {
                step: step.name.clone(),
                map_file: map_file_for_step(&step.name),
                kind: record.kind,
                document: record.document,
                entities: record.entities,
            });
        }
    }
    info!(
        steps = steps.len(),
        records = records.len(),
        "scan complete"
    );
    Ok(ScanSummary {
        log_path: log_path.to_path_buf(),
        steps: steps.len(),
        records,
    })
}
