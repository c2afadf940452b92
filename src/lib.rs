//! # bookfind
//!
//! Search the Open Library catalog from the terminal, keep a history of
//! keywords and picks, and bookmark titles.
//!
//! State lives in plain JSON files, one per collection
//! (`search_history_keyword.json`, `search_history_selection.json`,
//! `bookmarks.json`), each holding a top-level array. The files must exist
//! before use; an empty collection is `[]`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookfind::{
//!     catalog::OpenLibraryClient,
//!     flow::App,
//!     prompt::TerminalPrompter,
//!     store::JsonFileStore,
//! };
//!
//! let store = JsonFileStore::new("mock_database");
//! let client = OpenLibraryClient::new("https://openlibrary.org", None).unwrap();
//! let app = App::new(store, client, TerminalPrompter);
//!
//! app.search("dune").unwrap();
//! ```

pub mod catalog;
pub mod config;
pub mod display;
pub mod flow;
pub mod models;
pub mod prompt;
pub mod store;
pub mod telemetry;
