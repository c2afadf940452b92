//! Flat-file record store.
//!
//! Every collection is one JSON array on disk. There is no index: each
//! operation loads the whole collection, scans it, and (for mutations)
//! rewrites the whole file. Rewrites go through a temporary sibling file and
//! a rename, so a collection is never left half-written, but two processes
//! racing on the same collection still lose one side's update.

use crate::models::{Query, Record, ID_FIELD, TITLE_FIELD};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub const KEYWORD_HISTORY: &str = "search_history_keyword";
pub const SELECTION_HISTORY: &str = "search_history_selection";
pub const BOOKMARKS: &str = "bookmarks";

pub const COLLECTIONS: [&str; 3] = [KEYWORD_HISTORY, SELECTION_HISTORY, BOOKMARKS];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection '{collection}' not found at {}", .path.display())]
    Missing { collection: String, path: PathBuf },

    #[error("error reading collection '{collection}': {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("collection '{collection}' is not valid JSON: {source}")]
    Parse {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("collection '{collection}' is not an array of objects")]
    NotAnArray { collection: String },

    #[error("error serializing collection '{collection}': {source}")]
    Serialize {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fresh record id. Uniqueness is not checked against the collection.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// CRUD over named collections.
///
/// Implementors provide whole-collection `read` and `write`; the record
/// operations are built on top of those two and behave identically for
/// every backend.
pub trait Store {
    fn read(&self, collection: &str) -> Result<Vec<Record>, StoreError>;

    fn write(&self, collection: &str, records: &[Record]) -> Result<(), StoreError>;

    /// Appends `data` with a generated `_id` and returns the stored record.
    /// A caller-supplied `_id` is replaced.
    fn insert(&self, collection: &str, data: Record) -> Result<Record, StoreError> {
        let mut record = data;
        record.insert(ID_FIELD.to_string(), Value::String(new_id()));

        let mut records = self.read(collection)?;
        records.push(record.clone());
        self.write(collection, &records)?;

        debug!(collection, id = ?record.get(ID_FIELD), "inserted record");
        Ok(record)
    }

    /// All records, or those whose `query.key` strictly equals `query.value`.
    fn find(&self, collection: &str, query: Option<&Query>) -> Result<Vec<Record>, StoreError> {
        let records = self.read(collection)?;
        Ok(match query {
            Some(q) => records.into_iter().filter(|r| q.matches(r)).collect(),
            None => records,
        })
    }

    /// Inserts `{title}` unless a record with that exact title exists.
    /// Returns whether a record was inserted.
    fn save_unique(&self, collection: &str, title: &str) -> Result<bool, StoreError> {
        let records = self.read(collection)?;
        let exists = records
            .iter()
            .any(|r| r.get(TITLE_FIELD).and_then(Value::as_str) == Some(title));
        if exists {
            debug!(collection, title, "title already present");
            return Ok(false);
        }

        let mut data = Record::new();
        data.insert(TITLE_FIELD.to_string(), Value::String(title.to_string()));
        self.insert(collection, data)?;
        debug!(collection, title, "saved unique title");
        Ok(true)
    }

    /// Removes every matching record and returns how many went.
    /// Nothing is written when nothing matches.
    fn delete_one(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        let records = self.read(collection)?;
        let before = records.len();
        let kept: Vec<Record> = records.into_iter().filter(|r| !query.matches(r)).collect();
        let removed = before - kept.len();

        if removed == 0 {
            warn!(collection, key = %query.key, value = %query.value, "no record found for deletion");
            return Ok(0);
        }

        self.write(collection, &kept)?;
        debug!(collection, removed, "deleted records");
        Ok(removed)
    }
}

/// One `<collection>.json` file per collection inside a data directory.
/// Collection files must already exist; the store never creates them.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }
}

impl Store for JsonFileStore {
    fn read(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        let path = self.collection_path(collection);
        if !path.is_file() {
            return Err(StoreError::Missing {
                collection: collection.to_string(),
                path,
            });
        }

        let data = std::fs::read(&path).map_err(|source| StoreError::Io {
            collection: collection.to_string(),
            source,
        })?;
        let value: Value = serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
            collection: collection.to_string(),
            source,
        })?;

        let Value::Array(items) = value else {
            return Err(StoreError::NotAnArray {
                collection: collection.to_string(),
            });
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(StoreError::NotAnArray {
                    collection: collection.to_string(),
                }),
            })
            .collect()
    }

    fn write(&self, collection: &str, records: &[Record]) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let io_err = |source| StoreError::Io {
            collection: collection.to_string(),
            source,
        };

        // Dropping the temp file on any early return removes it from disk.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", collection))
            .suffix(".json.tmp")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                tmp.as_file()
                    .set_permissions(meta.permissions())
                    .map_err(io_err)?;
            }
            _ => {}
        }
        {
            let mut writer = std::io::BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
                StoreError::Serialize {
                    collection: collection.to_string(),
                    source,
                }
            })?;
            writer.flush().map_err(io_err)?;
        }
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(collection, path = %path.display(), records = records.len(), "wrote collection");
        Ok(())
    }
}

/// In-process store with the same contract as [`JsonFileStore`]: collections
/// must be created before use, and reading an unknown one fails.
#[derive(Default)]
pub struct MemoryStore {
    collections: RefCell<HashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with every collection the application uses, all empty.
    pub fn with_default_collections() -> Self {
        let store = Self::new();
        for c in COLLECTIONS {
            store.create(c);
        }
        store
    }

    pub fn create(&self, collection: &str) {
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default();
    }
}

impl Store for MemoryStore {
    fn read(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        self.collections
            .borrow()
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::Missing {
                collection: collection.to_string(),
                path: PathBuf::from(format!("memory:{}", collection)),
            })
    }

    fn write(&self, collection: &str, records: &[Record]) -> Result<(), StoreError> {
        self.collections
            .borrow_mut()
            .insert(collection.to_string(), records.to_vec());
        Ok(())
    }
}
