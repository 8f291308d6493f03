use std::fs;

use daily_verse_core::content::{ContentError, ContentItem, ContentLibrary};
use tempfile::tempdir;

const VERSES_JSON: &str = r#"[
  {"id": 1, "text": "Tuhan adalah gembalaku, takkan kekurangan aku.", "collectionName": "Mazmur", "majorDivision": 23, "minorDivision": 1, "category": "peace"},
  {"id": 2, "text": "Segala perkara dapat kutanggung di dalam Dia yang memberi kekuatan kepadaku.", "collectionName": "Filipi", "majorDivision": 4, "minorDivision": 13, "category": "strength"}
]"#;

fn item(id: u32) -> ContentItem {
    ContentItem {
        id,
        text: format!("verse {id}"),
        collection_name: "Yesaya".to_string(),
        major_division: 40,
        minor_division: 31,
        category: "hope".to_string(),
    }
}

#[test]
fn parses_camel_case_records_in_order() {
    let library = ContentLibrary::from_json(VERSES_JSON.as_bytes()).unwrap();

    assert_eq!(library.len(), 2);
    assert_eq!(library.items()[0].collection_name, "Mazmur");
    assert_eq!(library.items()[1].major_division, 4);
    assert_eq!(library.get(2).unwrap().category, "strength");
    assert!(library.version().as_str().starts_with("sha256:"));
}

#[test]
fn version_is_stable_and_order_sensitive() {
    let a = ContentLibrary::from_items(vec![item(1), item(2)]).unwrap();
    let b = ContentLibrary::from_items(vec![item(1), item(2)]).unwrap();
    let reordered = ContentLibrary::from_items(vec![item(2), item(1)]).unwrap();

    assert_eq!(a.version(), b.version());
    assert_ne!(a.version(), reordered.version());
}

#[test]
fn empty_list_is_valid() {
    let parsed = ContentLibrary::from_json(b"[]").unwrap();
    assert!(parsed.is_empty());
    assert_eq!(parsed.version(), ContentLibrary::empty().version());
}

#[test]
fn rejects_duplicate_ids() {
    let result = ContentLibrary::from_items(vec![item(1), item(2), item(1)]);
    assert!(matches!(result, Err(ContentError::DuplicateId(1))));
}

#[test]
fn rejects_reserved_fallback_id() {
    let result = ContentLibrary::from_items(vec![item(0)]);
    assert!(matches!(result, Err(ContentError::ReservedId(0))));
}

#[test]
fn rejects_blank_text() {
    let mut blank = item(4);
    blank.text = "   ".to_string();
    let result = ContentLibrary::from_items(vec![blank]);
    assert!(matches!(result, Err(ContentError::EmptyText(4))));
}

#[test]
fn rejects_zero_division() {
    let mut bad = item(5);
    bad.minor_division = 0;
    let result = ContentLibrary::from_items(vec![bad]);
    assert!(matches!(
        result,
        Err(ContentError::InvalidDivision { id: 5, major: 40, minor: 0 })
    ));
}

#[test]
fn rejects_malformed_json() {
    let result = ContentLibrary::from_json(b"{\"id\": 1}");
    assert!(matches!(result, Err(ContentError::Parse(_))));
}

#[test]
fn loads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("verses.json");
    fs::write(&path, VERSES_JSON).unwrap();

    let library = ContentLibrary::load(&path).unwrap();
    assert_eq!(library.len(), 2);

    let missing = ContentLibrary::load(&dir.path().join("absent.json"));
    assert!(matches!(missing, Err(ContentError::Io(_))));
}
