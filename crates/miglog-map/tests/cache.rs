use std::fs;
use std::path::Path;

use tempfile::TempDir;

use miglog_map::{
    AppendOnly, DEFAULT_MAP_FILE, DocumentCache, EAV_MAP_FILE, IgnoreAppender, IgnoreEntry,
    MapError, Patcher, RuleList,
};
use miglog_model::{ErrorKind, ErrorRecord};

const MAP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map>
  <source>
    <document_rules/>
    <field_rules/>
  </source>
  <destination>
    <document_rules/>
    <field_rules/>
  </destination>
</map>
"#;

fn seed_maps(dir: &Path) {
    fs::write(dir.join(DEFAULT_MAP_FILE), MAP_XML).unwrap();
    fs::write(dir.join(EAV_MAP_FILE), MAP_XML).unwrap();
}

fn append_document(cache: &mut DocumentCache, file_name: &str, value: &str) {
    let document = cache.get_mut(file_name).unwrap();
    let rules = document.rule_list_mut(RuleList::SourceDocuments).unwrap();
    AppendOnly.append(rules, &IgnoreEntry::Document(value.to_string()));
}

#[test]
fn repeated_gets_hand_back_the_same_resident_document() {
    let dir = TempDir::new().unwrap();
    seed_maps(dir.path());
    let mut cache = DocumentCache::new(dir.path());

    append_document(&mut cache, DEFAULT_MAP_FILE, "first");
    append_document(&mut cache, DEFAULT_MAP_FILE, "second");

    // Both appends landed on one tree, not on fresh loads.
    let document = cache.get_mut(DEFAULT_MAP_FILE).unwrap();
    let rules = document.rule_list(RuleList::SourceDocuments).unwrap();
    assert_eq!(rules.child_elements().count(), 2);
}

#[test]
fn distinct_file_names_are_distinct_documents() {
    let dir = TempDir::new().unwrap();
    seed_maps(dir.path());
    let mut cache = DocumentCache::new(dir.path());

    append_document(&mut cache, DEFAULT_MAP_FILE, "plain");
    append_document(&mut cache, EAV_MAP_FILE, "eav");

    assert!(cache.is_resident(DEFAULT_MAP_FILE));
    assert!(cache.is_resident(EAV_MAP_FILE));
    assert_eq!(cache.resident().count(), 2);

    let eav = cache.get_mut(EAV_MAP_FILE).unwrap();
    let rules = eav.rule_list(RuleList::SourceDocuments).unwrap();
    assert_eq!(rules.child_elements().count(), 1);
}

#[test]
fn load_failures_surface_through_get() {
    let dir = TempDir::new().unwrap();
    let mut cache = DocumentCache::new(dir.path());
    let err = cache.get_mut(DEFAULT_MAP_FILE).unwrap_err();
    assert!(matches!(err, MapError::Read { .. }));
    assert!(!cache.is_resident(DEFAULT_MAP_FILE));
}

#[test]
fn nothing_reaches_disk_before_flush_all() {
    let dir = TempDir::new().unwrap();
    seed_maps(dir.path());
    let mut cache = DocumentCache::new(dir.path());

    append_document(&mut cache, DEFAULT_MAP_FILE, "pending");
    let on_disk = fs::read_to_string(dir.path().join(DEFAULT_MAP_FILE)).unwrap();
    assert_eq!(on_disk, MAP_XML);
}

#[test]
fn flush_all_writes_every_resident_document() {
    let dir = TempDir::new().unwrap();
    seed_maps(dir.path());
    let mut cache = DocumentCache::new(dir.path());

    let record = ErrorRecord::documents(
        ErrorKind::SourceDocument,
        vec!["report_event".to_string()],
    );
    Patcher::new()
        .apply(&mut cache, "Map Step", &record)
        .unwrap();
    // Resident but never mutated; still written back.
    cache.get_mut(EAV_MAP_FILE).unwrap();

    let reports = cache.flush_all().unwrap();
    assert_eq!(reports.len(), 2);

    let by_name: Vec<(&str, usize)> = reports
        .iter()
        .map(|report| (report.file_name.as_str(), report.appended))
        .collect();
    assert_eq!(by_name, vec![(EAV_MAP_FILE, 0), (DEFAULT_MAP_FILE, 1)]);

    let patched = fs::read_to_string(dir.path().join(DEFAULT_MAP_FILE)).unwrap();
    assert!(patched.contains("<document>report_event</document>"));

    let untouched = fs::read_to_string(dir.path().join(EAV_MAP_FILE)).unwrap();
    assert!(untouched.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(!untouched.contains("report_event"));
}
