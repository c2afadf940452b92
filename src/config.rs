use crate::catalog::DEFAULT_API_URL;
use crate::store::{JsonFileStore, COLLECTIONS};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_DB_DIR: &str = "mock_database";

pub struct Config {
    pub db_dir: PathBuf,
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub strict: bool,
}

impl Config {
    pub fn new(
        db_override: Option<&str>,
        api_url: Option<&str>,
        timeout_secs: Option<u64>,
        strict: bool,
    ) -> Result<Self> {
        let db_dir = match db_override {
            Some(p) => PathBuf::from(p),
            None => default_db_dir(),
        };

        anyhow::ensure!(
            db_dir.is_dir(),
            "Database directory not found at {} (pass --db <DIR>)",
            db_dir.display()
        );

        let api_url = api_url.unwrap_or(DEFAULT_API_URL).to_string();
        anyhow::ensure!(
            api_url.starts_with("http://") || api_url.starts_with("https://"),
            "API URL must start with http:// or https:// (got '{}')",
            api_url
        );

        let config = Config {
            db_dir,
            api_url,
            timeout: timeout_secs.map(Duration::from_secs),
            strict,
        };
        config.warn_missing_collections();
        Ok(config)
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.db_dir)
    }

    /// Collection files are never created for the user; flag the gaps early.
    fn warn_missing_collections(&self) {
        let store = self.store();
        for c in COLLECTIONS {
            let path = store.collection_path(c);
            if !path.is_file() {
                warn!(collection = c, path = %path.display(), "collection file missing");
            }
        }
    }
}

/// `./mock_database` when it exists, else `mock_database` beside the
/// executable. Falls back to the relative path so the error names it.
fn default_db_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(DEFAULT_DB_DIR)));
    first_existing_dir([Some(PathBuf::from(DEFAULT_DB_DIR)), exe_dir])
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_DIR))
}

fn first_existing_dir(candidates: impl IntoIterator<Item = Option<PathBuf>>) -> Option<PathBuf> {
    candidates.into_iter().flatten().find(|p| p.is_dir())
}
