#![allow(dead_code)]

use anyhow::Result;
use bookfind::catalog::{Catalog, SearchError};
use bookfind::models::SearchResult;
use bookfind::prompt::Prompter;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

pub enum Answer {
    Pick(&'static str),
    Confirm(bool),
}

/// Replays canned answers; selections are matched by label.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    pub seen: RefCell<Vec<(String, Vec<String>)>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        ScriptedPrompter {
            answers: RefCell::new(answers.into()),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn choices_at(&self, n: usize) -> Vec<String> {
        self.seen.borrow()[n].1.clone()
    }

    pub fn exhausted(&self) -> bool {
        self.answers.borrow().is_empty()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, choices: &[String]) -> Result<usize> {
        self.seen
            .borrow_mut()
            .push((message.to_string(), choices.to_vec()));
        match self.answers.borrow_mut().pop_front() {
            Some(Answer::Pick(label)) => choices
                .iter()
                .position(|c| c == label)
                .ok_or_else(|| anyhow::anyhow!("'{}' not offered in {:?}", label, choices)),
            _ => anyhow::bail!("unexpected select prompt: {}", message),
        }
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.seen.borrow_mut().push((message.to_string(), Vec::new()));
        match self.answers.borrow_mut().pop_front() {
            Some(Answer::Confirm(yes)) => Ok(yes),
            _ => anyhow::bail!("unexpected confirm prompt: {}", message),
        }
    }
}

/// Canned results per query; unknown queries return no docs.
#[derive(Default)]
pub struct StubCatalog {
    results: HashMap<String, Vec<SearchResult>>,
    pub queries: RefCell<Vec<String>>,
    pub fail: bool,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        StubCatalog {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, query: &str, docs: Vec<SearchResult>) -> Self {
        self.results.insert(query.to_string(), docs);
        self
    }
}

impl Catalog for StubCatalog {
    fn search(&self, keyword: &str) -> std::result::Result<Vec<SearchResult>, SearchError> {
        self.queries.borrow_mut().push(keyword.to_string());
        if self.fail {
            return Err(SearchError::Request {
                term: keyword.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.results.get(keyword).cloned().unwrap_or_default())
    }

    fn detail(&self, id: &str) -> std::result::Result<Option<Value>, SearchError> {
        let docs = self.search(id)?;
        Ok(if docs.is_empty() {
            None
        } else {
            Some(serde_json::json!({ "docs": docs }))
        })
    }
}

pub fn book(title: &str, author: Option<&str>, year: Option<i64>) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        author_name: author.map(|a| vec![a.to_string()]),
        first_publish_year: year,
    }
}

pub fn dune_results() -> Vec<SearchResult> {
    vec![
        book("Dune", Some("Frank Herbert"), Some(1965)),
        book("Dune Messiah", Some("Frank Herbert"), None),
    ]
}
