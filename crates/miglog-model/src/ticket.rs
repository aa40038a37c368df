use serde::{Deserialize, Serialize};

/// A review work item: entities were ignored automatically during triage and
/// each one needs a human decision before the next migration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTicket {
    pub title: String,
    pub description: String,
    pub subtasks: Vec<Subtask>,
}

/// One entity inside a [`ReviewTicket`], with a short summary line and a
/// detail line carrying the full context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub summary: String,
    pub detail: String,
}

/// Receives one ticket per batch of generated ignore rules (one step, one
/// error kind). Implementations decide what "filing" means; the triage core
/// never talks to a ticket system directly.
pub trait TicketSink {
    fn queue_issue(&mut self, ticket: ReviewTicket) -> anyhow::Result<()>;
}

/// Sink that drops every ticket. Used when no ticket output is configured.
#[derive(Debug, Default)]
pub struct DiscardTickets;

impl TicketSink for DiscardTickets {
    fn queue_issue(&mut self, _ticket: ReviewTicket) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Accumulates the ignored entities of one (step, kind) batch into a
/// [`ReviewTicket`].
#[derive(Debug)]
pub struct TicketBuilder {
    prefix: String,
    title: String,
    description: String,
    subtasks: Vec<Subtask>,
}

impl TicketBuilder {
    /// Batch of ignored documents (source or destination) for one step.
    pub fn ignored_documents(step: &str) -> Self {
        let prefix = title_prefix(step);
        Self {
            title: format!("{prefix} Ignored Documents"),
            description: "Documents are being ignored. These need to be checked one by one \
                          to either confirm it should be ignored or to manage proper migration"
                .to_string(),
            prefix,
            subtasks: Vec::new(),
        }
    }

    /// Batch of ignored fields (source or destination) for one step.
    pub fn ignored_fields(step: &str) -> Self {
        let prefix = title_prefix(step);
        Self {
            title: format!("{prefix} Ignored Fields"),
            description: "Fields are being ignored. These need to be checked one by one \
                          to either confirm it should be ignored or to manage proper migration"
                .to_string(),
            prefix,
            subtasks: Vec::new(),
        }
    }

    pub fn push_document(&mut self, name: &str) {
        let line = format!("{} , Ignored Doc: {name}", self.prefix);
        self.subtasks.push(Subtask {
            summary: line.clone(),
            detail: line,
        });
    }

    pub fn push_field(&mut self, document: &str, field: &str) {
        self.subtasks.push(Subtask {
            summary: format!("{} , Ignored Field: {field}", self.prefix),
            detail: format!(
                "{} Document: {document} , Ignored Field: {field}",
                self.prefix
            ),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.subtasks.is_empty()
    }

    /// Returns the assembled ticket, or `None` when nothing was ignored in
    /// this batch (empty batches never reach the sink).
    pub fn finish(self) -> Option<ReviewTicket> {
        if self.subtasks.is_empty() {
            return None;
        }
        Some(ReviewTicket {
            title: self.title,
            description: self.description,
            subtasks: self.subtasks,
        })
    }
}

fn title_prefix(step: &str) -> String {
    format!("Data Migration, Step: {step}")
}
