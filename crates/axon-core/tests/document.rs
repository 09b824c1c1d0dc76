use std::collections::HashMap;

use axon_core::Document;

#[test]
fn new_has_empty_metadata() {
    let doc = Document::new("1", "some content");
    assert_eq!(doc.id, "1");
    assert_eq!(doc.content, "some content");
    assert!(doc.metadata.is_empty());
}

#[test]
fn with_metadata_preserved_through_serde() {
    let mut metadata = HashMap::new();
    metadata.insert("source".to_string(), serde_json::json!("test.txt"));

    let doc = Document::with_metadata("1", "content", metadata);
    let json = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn metadata_defaults_when_absent() {
    let doc: Document = serde_json::from_str(r#"{"id":"1","content":"c"}"#).unwrap();
    assert!(doc.metadata.is_empty());
}
