//! Malformed and foreign documents
//!
//! A file that exists but is not a well-formed `source` document is never
//! silently replaced: opening fails with `CorruptDocument` and the bytes on
//! disk stay exactly as they were.

use crate::common::*;
use std::fs;
use tempfile::TempDir;

fn open_over(contents: &str) -> (TempDir, Result<Stockroom, StoreError>) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stock.json"), contents).unwrap();
    let result = Stockroom::open(config_for(&dir));
    (dir, result)
}

#[test]
fn misnamed_root_fails_and_is_left_alone() {
    let contents = r#"{"warehouse":{"categories":[]}}"#;
    let (dir, result) = open_over(contents);

    let err = result.unwrap_err();
    assert!(matches!(err, StoreError::CorruptDocument(_)), "{:?}", err);
    assert!(err.to_string().contains("warehouse"));
    assert_eq!(
        fs::read_to_string(dir.path().join("stock.json")).unwrap(),
        contents
    );
}

#[test]
fn unparsable_file_fails_and_is_left_alone() {
    let contents = "{\"source\": {\"categories\": [";
    let (dir, result) = open_over(contents);

    assert!(matches!(result, Err(StoreError::CorruptDocument(_))));
    assert_eq!(
        fs::read_to_string(dir.path().join("stock.json")).unwrap(),
        contents
    );
}

#[test]
fn record_with_wrong_field_type_is_corrupt() {
    let contents = r#"{"source":{"categories":[{"id":"one","name":"A","description":""}]}}"#;
    let (_dir, result) = open_over(contents);

    // opening only checks shape; decoding the record fails
    let stockroom = result.unwrap();
    let err = stockroom.categories().get_all().unwrap_err();
    assert!(matches!(err, StoreError::CorruptDocument(_)));
}

#[test]
fn blank_file_is_bootstrapped() {
    let (dir, result) = open_over("  \n");
    let stockroom = result.unwrap();

    assert!(stockroom.orders().get_all().unwrap().is_empty());
    let text = fs::read_to_string(dir.path().join("stock.json")).unwrap();
    assert!(text.contains("\"source\""));
    assert!(text.contains("\"orders\""));
}

#[test]
fn missing_collections_are_added_and_data_kept() {
    let contents =
        r#"{"source":{"categories":[{"id":7,"name":"Tea","description":"Leaves","note":"x"}]}}"#;
    let (dir, result) = open_over(contents);
    let stockroom = result.unwrap();

    let categories = stockroom.categories().get_all().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, 7);

    let doc = stockroom.store().load().unwrap();
    let names: Vec<&str> = doc.collections().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["categories", "products", "suppliers", "orders"]);

    // the unknown field survives the rewrite
    let text = fs::read_to_string(dir.path().join("stock.json")).unwrap();
    let tree: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(tree["source"]["categories"][0]["note"], "x");
    assert_eq!(tree["source"]["orders"], serde_json::json!([]));
}
