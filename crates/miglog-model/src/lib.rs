pub mod record;
pub mod ticket;

pub use record::{ErrorKind, ErrorRecord, LogStep};
pub use ticket::{DiscardTickets, ReviewTicket, Subtask, TicketBuilder, TicketSink};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_order_runs_documents_before_fields_per_side() {
        assert_eq!(
            ErrorKind::ALL,
            [
                ErrorKind::SourceDocument,
                ErrorKind::SourceField,
                ErrorKind::DestinationDocument,
                ErrorKind::DestinationField,
            ]
        );
        assert!(!ErrorKind::SourceDocument.is_field_kind());
        assert!(ErrorKind::DestinationField.is_field_kind());
    }

    #[test]
    fn kind_display_names_the_side_and_shape() {
        assert_eq!(ErrorKind::SourceDocument.to_string(), "source documents");
        assert_eq!(
            ErrorKind::DestinationField.to_string(),
            "destination fields"
        );
    }

    #[test]
    fn document_ticket_repeats_the_line_in_summary_and_detail() {
        let mut builder = TicketBuilder::ignored_documents("Map Step");
        builder.push_document("sales_order");
        let ticket = builder.finish().expect("one subtask queued");
        assert_eq!(
            ticket.title,
            "Data Migration, Step: Map Step Ignored Documents"
        );
        assert_eq!(ticket.subtasks.len(), 1);
        assert_eq!(
            ticket.subtasks[0].summary,
            "Data Migration, Step: Map Step , Ignored Doc: sales_order"
        );
        assert_eq!(ticket.subtasks[0].summary, ticket.subtasks[0].detail);
    }

    #[test]
    fn field_ticket_detail_carries_the_document() {
        let mut builder = TicketBuilder::ignored_fields("EAV Step");
        builder.push_field("catalog_product", "legacy_sku");
        let ticket = builder.finish().expect("one subtask queued");
        assert_eq!(ticket.title, "Data Migration, Step: EAV Step Ignored Fields");
        assert_eq!(
            ticket.subtasks[0].summary,
            "Data Migration, Step: EAV Step , Ignored Field: legacy_sku"
        );
        assert_eq!(
            ticket.subtasks[0].detail,
            "Data Migration, Step: EAV Step Document: catalog_product , Ignored Field: legacy_sku"
        );
    }

    #[test]
    fn empty_batches_produce_no_ticket() {
        let builder = TicketBuilder::ignored_documents("Map Step");
        assert!(builder.is_empty());
        assert!(builder.finish().is_none());
    }

    #[test]
    fn record_serializes_without_document_when_absent() {
        let record = ErrorRecord::documents(
            ErrorKind::SourceDocument,
            vec!["sales_order".to_string(), "sales_invoice".to_string()],
        );
        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["kind"], "source_document");
        assert!(json.get("document").is_none());
        let round: ErrorRecord = serde_json::from_value(json).expect("deserialize record");
        assert_eq!(round, record);

        let record = ErrorRecord::fields(
            ErrorKind::SourceField,
            "catalog_product",
            vec!["old_price".to_string()],
        );
        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["kind"], "source_field");
        assert_eq!(json["document"], "catalog_product");
    }
}
