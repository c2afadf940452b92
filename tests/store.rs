use bookfind::models::{Query, Record, ID_FIELD};
use bookfind::store::{JsonFileStore, Store, StoreError, BOOKMARKS, COLLECTIONS, KEYWORD_HISTORY};
use serde_json::{json, Value};
use std::fs;
use tempfile::{tempdir, TempDir};

fn seeded_store() -> (TempDir, JsonFileStore) {
    let dir = tempdir().expect("failed to create tempdir");
    for c in COLLECTIONS {
        fs::write(dir.path().join(format!("{}.json", c)), "[]").unwrap();
    }
    let store = JsonFileStore::new(dir.path());
    (dir, store)
}

fn record(v: Value) -> Record {
    serde_json::from_value(v).unwrap()
}

#[test]
fn missing_file_is_an_error_and_is_not_created() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    let err = store.read(BOOKMARKS).unwrap_err();
    assert!(matches!(err, StoreError::Missing { .. }));

    let err = store.save_unique(BOOKMARKS, "Dune").unwrap_err();
    assert!(matches!(err, StoreError::Missing { .. }));
    assert!(!store.collection_path(BOOKMARKS).exists());
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let (_dir, store) = seeded_store();
    fs::write(store.collection_path(BOOKMARKS), "[{\"title\": ").unwrap();

    assert!(matches!(store.read(BOOKMARKS), Err(StoreError::Parse { .. })));
}

#[test]
fn non_array_file_is_rejected() {
    let (_dir, store) = seeded_store();
    fs::write(store.collection_path(BOOKMARKS), "{\"title\": \"Dune\"}").unwrap();
    assert!(matches!(store.read(BOOKMARKS), Err(StoreError::NotAnArray { .. })));

    fs::write(store.collection_path(BOOKMARKS), "[\"Dune\"]").unwrap();
    assert!(matches!(store.read(BOOKMARKS), Err(StoreError::NotAnArray { .. })));
}

#[test]
fn insert_persists_with_generated_id() {
    let (_dir, store) = seeded_store();

    let stored = store.insert(BOOKMARKS, record(json!({"title": "Dune"}))).unwrap();

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(store.collection_path(BOOKMARKS)).unwrap()).unwrap();
    let arr = on_disk.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["title"], "Dune");
    assert_eq!(arr[0].get(ID_FIELD), stored.get(ID_FIELD));
    assert!(arr[0][ID_FIELD].as_str().is_some_and(|id| !id.is_empty()));
}

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn rewrite_leaves_no_temp_file() {
    let (dir, store) = seeded_store();
    store.insert(BOOKMARKS, record(json!({"title": "Dune"}))).unwrap();

    assert_eq!(
        dir_entries(dir.path()),
        [
            "bookmarks.json",
            "search_history_keyword.json",
            "search_history_selection.json"
        ]
    );
}

#[test]
fn failed_rewrite_cleans_up_temp_file() {
    let dir = tempdir().unwrap();
    // A directory where the collection file should be makes the final rename fail.
    fs::create_dir(dir.path().join("bookmarks.json")).unwrap();
    fs::write(dir.path().join("bookmarks.json").join("keep"), "").unwrap();
    let store = JsonFileStore::new(dir.path());

    let err = store.write(BOOKMARKS, &[record(json!({"title": "Dune"}))]).unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(dir_entries(dir.path()), ["bookmarks.json"]);
}

#[test]
fn save_unique_is_idempotent() {
    let (_dir, store) = seeded_store();

    assert!(store.save_unique(KEYWORD_HISTORY, "dune").unwrap());
    assert!(!store.save_unique(KEYWORD_HISTORY, "dune").unwrap());

    let matches = store.find(KEYWORD_HISTORY, Some(&Query::title("dune"))).unwrap();
    assert_eq!(matches.len(), 1);
}

#[test]
fn find_returns_exact_subset() {
    let (_dir, store) = seeded_store();
    for (title, year) in [("Dune", 1965), ("Emma", 1815), ("Dune", 1984)] {
        store
            .insert(BOOKMARKS, record(json!({ "title": title, "year": year })))
            .unwrap();
    }

    let all = store.find(BOOKMARKS, None).unwrap();
    assert_eq!(all, store.read(BOOKMARKS).unwrap());
    assert_eq!(all.len(), 3);

    let dune = store.find(BOOKMARKS, Some(&Query::title("Dune"))).unwrap();
    let expected: Vec<Record> = all
        .iter()
        .filter(|r| r["title"] == "Dune")
        .cloned()
        .collect();
    assert_eq!(dune, expected);

    assert!(store.find(BOOKMARKS, Some(&Query::title("Du"))).unwrap().is_empty());
    assert_eq!(store.find(BOOKMARKS, Some(&Query::new("year", 1815))).unwrap().len(), 1);
    assert!(store.find(BOOKMARKS, Some(&Query::new("year", "1815"))).unwrap().is_empty());
}

#[test]
fn delete_removes_all_matches() {
    let (_dir, store) = seeded_store();
    for t in ["Dune", "Emma", "Dune"] {
        store.insert(BOOKMARKS, record(json!({ "title": t }))).unwrap();
    }

    assert_eq!(store.delete_one(BOOKMARKS, &Query::title("Dune")).unwrap(), 2);

    let left = store.read(BOOKMARKS).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0]["title"], "Emma");
}

#[test]
fn delete_without_match_does_not_touch_the_file() {
    let (_dir, store) = seeded_store();
    let path = store.collection_path(BOOKMARKS);
    // Hand-formatted so any rewrite would change the bytes.
    let original = "[{\"title\":\"Emma\",\"_id\":\"x\"}]";
    fs::write(&path, original).unwrap();

    assert_eq!(store.delete_one(BOOKMARKS, &Query::title("Dune")).unwrap(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn unknown_fields_survive_rewrites() {
    let (_dir, store) = seeded_store();
    fs::write(
        store.collection_path(BOOKMARKS),
        r#"[{"title": "Emma", "_id": "1", "note": {"shelf": 3}}]"#,
    )
    .unwrap();

    store.save_unique(BOOKMARKS, "Dune").unwrap();

    let emma = store.find(BOOKMARKS, Some(&Query::title("Emma"))).unwrap();
    assert_eq!(emma[0]["note"], json!({"shelf": 3}));
    assert_eq!(emma[0][ID_FIELD], "1");
}
