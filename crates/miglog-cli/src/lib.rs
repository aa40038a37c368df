//! CLI library components for the migration log triage tool.

pub mod logging;
pub mod pipeline;
