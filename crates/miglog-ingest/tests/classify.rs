use miglog_ingest::{classify, extract, has_error_marker};
use miglog_model::{ErrorKind, ErrorRecord, LogStep};

fn step(body: &str) -> LogStep {
    LogStep::new("Map Step", body)
}

#[test]
fn steps_without_the_marker_yield_no_records() {
    let quiet = step("2024-01-01 [INFO]: 120 records migrated\nall good\n");
    assert!(!has_error_marker(&quiet.body));
    assert!(classify(&quiet).is_empty());
}

#[test]
fn the_marker_gate_is_case_sensitive_even_though_phrases_are_not() {
    // The phrase alone matches the extraction rule, but a body whose only
    // marker is lowercase never reaches it through classify.
    let body = "[error]: Source documents are not mapped. legacy_tmp\n";
    assert!(!has_error_marker(body));
    assert!(classify(&step(body)).is_empty());
    assert_eq!(extract(body, ErrorKind::SourceDocument).len(), 1);
}

#[test]
fn marker_without_a_known_phrase_yields_no_records() {
    let noisy = step("[ERROR]: connection reset during bulk insert\n");
    assert!(has_error_marker(&noisy.body));
    assert!(classify(&noisy).is_empty());
}

#[test]
fn source_documents_phrase_yields_one_record_per_occurrence() {
    let body = "\
[ERROR]: Source documents are not mapped. sales_order,sales_invoice\n\
some unrelated line\n\
[ERROR]: Source documents are not mapped. customer_log\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(
        records,
        vec![
            ErrorRecord::documents(
                ErrorKind::SourceDocument,
                vec!["sales_order".to_string(), "sales_invoice".to_string()],
            ),
            ErrorRecord::documents(ErrorKind::SourceDocument, vec!["customer_log".to_string()]),
        ]
    );
}

#[test]
fn destination_documents_phrase_routes_to_its_own_kind() {
    let body = "[ERROR]: Destination documents are not mapped. new_sales_order\n";
    let records = extract(body, ErrorKind::DestinationDocument);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, ErrorKind::DestinationDocument);
    assert_eq!(records[0].entities, vec!["new_sales_order"]);
    assert!(extract(body, ErrorKind::SourceDocument).is_empty());
}

#[test]
fn field_phrases_carry_their_document() {
    let body = "[ERROR]: Source fields are not mapped. Document: catalog_product. Fields: old_price,legacy_sku\n";
    let records = extract(body, ErrorKind::SourceField);
    assert_eq!(
        records,
        vec![ErrorRecord::fields(
            ErrorKind::SourceField,
            "catalog_product",
            vec!["old_price".to_string(), "legacy_sku".to_string()],
        )]
    );
}

#[test]
fn destination_field_phrase_is_distinct_from_source() {
    let body = "[ERROR]: Destination fields are not mapped. Document: new_catalog. Fields: ref_id\n";
    assert!(extract(body, ErrorKind::SourceField).is_empty());
    let records = extract(body, ErrorKind::DestinationField);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].document.as_deref(), Some("new_catalog"));
}

#[test]
fn entity_lists_tolerate_padding_and_stray_commas() {
    let body = "[ERROR]: Source documents are not mapped. DOC_A, DOC_B\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(records[0].entities, vec!["DOC_A", "DOC_B"]);

    // Space on either side of the separator.
    let body = "[ERROR]: Source documents are not mapped. foo, bar , baz\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entities, vec!["foo", "bar", "baz"]);

    let body = "[ERROR]: Source documents are not mapped. a,,b,\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(records[0].entities, vec!["a", "b"]);
}

#[test]
fn entity_lists_stop_at_the_end_of_the_line() {
    let body = "[ERROR]: Source documents are not mapped. first_doc\nsecond_doc\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entities, vec!["first_doc"]);
}

#[test]
fn trailing_prose_is_not_swallowed_into_the_list() {
    let body = "[ERROR]: Source documents are not mapped. doc_a, doc_b and 3 more\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(records[0].entities, vec!["doc_a", "doc_b"]);
}

#[test]
fn phrases_match_case_insensitively() {
    let body = "[ERROR]: SOURCE DOCUMENTS ARE NOT MAPPED. legacy_tmp\n";
    let records = extract(body, ErrorKind::SourceDocument);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entities, vec!["legacy_tmp"]);
}

#[test]
fn repeated_documents_stay_separate_records() {
    // Two field lines for the same document are two records; nothing merges.
    let body = "\
[ERROR]: Source fields are not mapped. Document: sales_order. Fields: legacy_a\n\
[ERROR]: Source fields are not mapped. Document: sales_order. Fields: legacy_b\n";
    let records = extract(body, ErrorKind::SourceField);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entities, vec!["legacy_a"]);
    assert_eq!(records[1].entities, vec!["legacy_b"]);
}

#[test]
fn classify_returns_kinds_in_fixed_order_regardless_of_log_order() {
    let body = "\
[ERROR]: Destination fields are not mapped. Document: new_doc. Fields: f1\n\
[ERROR]: Source documents are not mapped. doc_x\n\
[ERROR]: Destination documents are not mapped. doc_y\n\
[ERROR]: Source fields are not mapped. Document: old_doc. Fields: f2\n";
    let kinds: Vec<ErrorKind> = classify(&step(body)).iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::SourceDocument,
            ErrorKind::SourceField,
            ErrorKind::DestinationDocument,
            ErrorKind::DestinationField,
        ]
    );
}

#[test]
fn classify_handles_a_realistic_step_body() {
    let body = "\
2024-03-07 11:02:15 [INFO]: step started\n\
2024-03-07 11:02:16 [ERROR]: Source documents are not mapped. report_event,report_compared\n\
2024-03-07 11:02:16 [ERROR]: Source fields are not mapped. Document: sales_order. Fields: base_custbalance_amount, customer_balance_amount\n\
2024-03-07 11:02:17 [INFO]: step finished\n";
    let records = classify(&step(body));
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].entities,
        vec!["report_event", "report_compared"]
    );
    assert_eq!(records[1].document.as_deref(), Some("sales_order"));
    assert_eq!(
        records[1].entities,
        vec!["base_custbalance_amount", "customer_balance_amount"]
    );
}
