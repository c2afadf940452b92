//! Open Library search client.
//!
//! Keyword search and "detail" lookup hit the same `search.json` endpoint;
//! a detail lookup is a keyword search with the id substituted as the query,
//! so it is not guaranteed to return one authoritative record.

use crate::models::{SearchResponse, SearchResult};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://openlibrary.org";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request for '{term}' failed: {message}")]
    Request { term: String, message: String },

    #[error("malformed response for '{term}': {message}")]
    Parse { term: String, message: String },
}

pub trait Catalog {
    fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// Whole parsed body for `id`, or `None` when the body is empty.
    fn detail(&self, id: &str) -> Result<Option<Value>, SearchError>;
}

pub struct OpenLibraryClient {
    http: reqwest::blocking::Client,
    base_url: String,
    show_spinner: bool,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        // reqwest's blocking client defaults to 30s; no timeout unless asked for.
        builder = builder.timeout(timeout);
        let http = builder.build()?;

        Ok(OpenLibraryClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            show_spinner: true,
        })
    }

    pub fn quiet(mut self) -> Self {
        self.show_spinner = false;
        self
    }

    pub fn search_url(&self) -> String {
        format!("{}/search.json", self.base_url)
    }

    fn fetch(&self, term: &str, label: &str) -> Result<String, SearchError> {
        let request_err = |e: reqwest::Error| SearchError::Request {
            term: term.to_string(),
            message: e.to_string(),
        };

        let pb = self.spinner(format!("{} {}", label, term));
        debug!(term, url = %self.search_url(), "sending search request");

        let result = self
            .http
            .get(self.search_url())
            .query(&[("q", term)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text());

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result.map_err(request_err)
    }

    fn spinner(&self, msg: String) -> Option<ProgressBar> {
        if !self.show_spinner {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    }
}

impl Catalog for OpenLibraryClient {
    fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchError> {
        let body = self.fetch(keyword, "Fetching data for:")?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Parse {
                term: keyword.to_string(),
                message: e.to_string(),
            })?;
        debug!(keyword, docs = parsed.docs.len(), "search complete");
        Ok(parsed.docs)
    }

    fn detail(&self, id: &str) -> Result<Option<Value>, SearchError> {
        let body = self.fetch(id, "Fetching detailed data for ID:")?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&body).map_err(|e| SearchError::Parse {
            term: id.to_string(),
            message: e.to_string(),
        })?;
        Ok(match value {
            Value::Null => None,
            v => Some(v),
        })
    }
}

/// Keyword search that treats failure as "no results" unless `strict`.
pub fn search_or_empty<C: Catalog + ?Sized>(
    catalog: &C,
    keyword: &str,
    strict: bool,
) -> Result<Vec<SearchResult>, SearchError> {
    match catalog.search(keyword) {
        Ok(docs) => Ok(docs),
        Err(e) if !strict => {
            warn!(error = %e, "search failed, treating as no results");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Detail lookup that treats failure as "no details" unless `strict`.
pub fn detail_or_none<C: Catalog + ?Sized>(
    catalog: &C,
    id: &str,
    strict: bool,
) -> Result<Option<Value>, SearchError> {
    match catalog.detail(id) {
        Ok(v) => Ok(v),
        Err(e) if !strict => {
            warn!(error = %e, "detail lookup failed, treating as empty");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
