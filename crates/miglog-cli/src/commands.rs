use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use miglog_cli::pipeline::{RunSummary, ScanSummary, TriageConfig, run_triage, scan_log};
use miglog_ingest::resolve_log_path;
use miglog_model::{DiscardTickets, ReviewTicket, TicketSink};

use crate::cli::{RunArgs, ScanArgs};

pub fn triage_command(args: &RunArgs) -> Result<RunSummary> {
    let log_path = resolve_log_path(&args.migration_dir, args.migration_log.as_deref());
    let map_dir = args
        .map_dir
        .clone()
        .unwrap_or_else(|| args.migration_dir.clone());
    let config = TriageConfig {
        log_path,
        map_dir,
        dry_run: args.dry_run,
    };
    match &args.tickets_json {
        Some(path) => {
            let mut sink = JsonTicketSink::default();
            let summary = run_triage(&config, &mut sink)?;
            sink.write_to(path)?;
            Ok(summary)
        }
        None => {
            let mut sink = DiscardTickets;
            run_triage(&config, &mut sink)
        }
    }
}

pub fn scan_command(args: &ScanArgs) -> Result<ScanSummary> {
    let log_path = resolve_log_path(&args.migration_dir, args.migration_log.as_deref());
    scan_log(&log_path)
}

/// Collects queued tickets and writes them out as pretty-printed JSON.
#[derive(Debug, Default)]
struct JsonTicketSink {
    tickets: Vec<ReviewTicket>,
}

impl JsonTicketSink {
    fn write_to(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.tickets).context("serialize review tickets")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(
            path = %path.display(),
            tickets = self.tickets.len(),
            "wrote review tickets"
        );
        Ok(())
    }
}

impl TicketSink for JsonTicketSink {
    fn queue_issue(&mut self, ticket: ReviewTicket) -> Result<()> {
        self.tickets.push(ticket);
        Ok(())
    }
}
