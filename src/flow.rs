//! Interactive flows behind each subcommand.
//!
//! Every entry point runs to completion and reports what happened as an
//! outcome value. Exit, Cancel and a declined confirmation are ordinary
//! outcomes; only store failures (and catalog failures in strict mode)
//! come back as errors.

use crate::catalog::{self, Catalog};
use crate::display;
use crate::models::{Query, SearchResult, TitledEntry};
use crate::prompt::Prompter;
use crate::store::{self, Store};
use anyhow::{Context, Result};
use tracing::{debug, info};

pub const EXIT: &str = "Exit";
pub const CANCEL: &str = "Cancel";
pub const BOOKMARK: &str = "🔖 Bookmark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HistoryKind {
    Keywords,
    Selections,
}

impl HistoryKind {
    pub fn collection(self) -> &'static str {
        match self {
            HistoryKind::Keywords => store::KEYWORD_HISTORY,
            HistoryKind::Selections => store::SELECTION_HISTORY,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            HistoryKind::Keywords => "keyword",
            HistoryKind::Selections => "selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NoResults,
    Exited,
    Viewed { title: String, detail: DetailOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Exited,
    Bookmark(BookmarkOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkOutcome {
    Saved,
    AlreadyBookmarked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    Exited,
    ReplayedKeyword(SearchOutcome),
    ReplayedSelection {
        requested: String,
        shown: String,
        matched_exactly: bool,
        detail: DetailOutcome,
    },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageOutcome {
    Empty,
    Canceled,
    Declined { title: String },
    Deleted { title: String, removed: usize },
}

pub struct App<S, C, P> {
    pub store: S,
    pub catalog: C,
    pub prompter: P,
    /// Propagate catalog failures instead of treating them as empty results.
    pub strict: bool,
}

impl<S: Store, C: Catalog, P: Prompter> App<S, C, P> {
    pub fn new(store: S, catalog: C, prompter: P) -> Self {
        App {
            store,
            catalog,
            prompter,
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Search, pick a result, record the pick, show its details.
    pub fn search(&self, keyword: &str) -> Result<SearchOutcome> {
        let results = self.titled_results(keyword)?;
        if results.is_empty() {
            display::notice("No results found.");
            return Ok(SearchOutcome::NoResults);
        }

        if self
            .store
            .save_unique(store::KEYWORD_HISTORY, keyword)
            .with_context(|| format!("Error saving keyword '{}'", keyword))?
        {
            info!(keyword, "saved keyword to history");
        }

        let mut choices: Vec<String> = results.iter().map(display::choice_label).collect();
        choices.push(EXIT.to_string());

        let picked = self.prompter.select("Select an item", &choices)?;
        let Some(item) = results.get(picked) else {
            display::notice("Exiting search...");
            return Ok(SearchOutcome::Exited);
        };

        if self
            .store
            .save_unique(store::SELECTION_HISTORY, &item.title)
            .with_context(|| format!("Error saving selection '{}'", item.title))?
        {
            info!(title = %item.title, "saved selection to history");
        }

        let detail = self.show_details(item)?;
        Ok(SearchOutcome::Viewed {
            title: item.title.clone(),
            detail,
        })
    }

    pub fn show_details(&self, item: &SearchResult) -> Result<DetailOutcome> {
        display::print_details(item);

        let choices = [BOOKMARK.to_string(), EXIT.to_string()];
        let picked = self.prompter.select("What would you like to do?", &choices)?;
        if picked != 0 {
            display::notice("Returning to main menu.");
            return Ok(DetailOutcome::Exited);
        }

        Ok(DetailOutcome::Bookmark(self.bookmark(&item.title)?))
    }

    /// Bookmarks `title` unless a bookmark with the same title exists.
    pub fn bookmark(&self, title: &str) -> Result<BookmarkOutcome> {
        let existing = self
            .store
            .find(store::BOOKMARKS, Some(&Query::title(title)))
            .context("Error loading bookmarks")?;
        if !existing.is_empty() {
            display::notice("🔖 Already bookmarked.");
            return Ok(BookmarkOutcome::AlreadyBookmarked);
        }

        self.store
            .save_unique(store::BOOKMARKS, title)
            .with_context(|| format!("Error bookmarking '{}'", title))?;
        display::success(&format!("Bookmarked: {}", title));
        Ok(BookmarkOutcome::Saved)
    }

    /// Pick a past keyword or selection and replay it.
    pub fn history(&self, kind: HistoryKind) -> Result<HistoryOutcome> {
        let records = self
            .store
            .find(kind.collection(), None)
            .with_context(|| format!("Error loading {} history", kind.noun()))?;
        let entries = TitledEntry::from_records(records);

        if entries.is_empty() {
            display::notice(&format!("No {} history found.", kind.noun()));
        }

        let mut choices: Vec<String> = entries.iter().map(|e| e.title.clone()).collect();
        choices.push(EXIT.to_string());

        let picked = self
            .prompter
            .select(&format!("Select a {}:", kind.noun()), &choices)?;
        let Some(entry) = entries.get(picked) else {
            display::notice("Exiting history view.");
            return Ok(HistoryOutcome::Exited);
        };

        match kind {
            HistoryKind::Keywords => Ok(HistoryOutcome::ReplayedKeyword(self.search(&entry.title)?)),
            HistoryKind::Selections => self.replay_selection(&entry.title),
        }
    }

    /// Re-queries by title and shows the first exact title match, or the
    /// first result when none matches exactly. The fallback may be an
    /// unrelated item.
    fn replay_selection(&self, title: &str) -> Result<HistoryOutcome> {
        let results = self.titled_results(title)?;
        let Some((item, matched_exactly)) = pick_replay(&results, title) else {
            display::notice("No details found for this selection.");
            return Ok(HistoryOutcome::NotFound);
        };
        if !matched_exactly {
            debug!(requested = title, shown = %item.title, "no exact title match, showing first result");
        }

        let detail = self.show_details(item)?;
        Ok(HistoryOutcome::ReplayedSelection {
            requested: title.to_string(),
            shown: item.title.clone(),
            matched_exactly,
            detail,
        })
    }

    fn titled_results(&self, term: &str) -> Result<Vec<SearchResult>> {
        let mut results = catalog::search_or_empty(&self.catalog, term, self.strict)?;
        let before = results.len();
        results.retain(SearchResult::has_title);
        if results.len() < before {
            debug!(term, skipped = before - results.len(), "dropped untitled results");
        }
        Ok(results)
    }

    /// Pick a bookmark and delete it after confirmation.
    pub fn manage_bookmarks(&self) -> Result<ManageOutcome> {
        let bookmarks = self.load_bookmarks()?;
        if bookmarks.is_empty() {
            display::notice("📂 No bookmarks saved.");
            return Ok(ManageOutcome::Empty);
        }

        let mut choices: Vec<String> = bookmarks.iter().map(|b| b.title.clone()).collect();
        choices.push(CANCEL.to_string());

        let picked = self
            .prompter
            .select("Select a bookmark to manage:", &choices)?;
        let Some(bookmark) = bookmarks.get(picked) else {
            display::notice("Operation canceled.");
            return Ok(ManageOutcome::Canceled);
        };
        let title = bookmark.title.clone();

        let confirmed = self.prompter.confirm(
            &format!("Are you sure you want to delete \"{}\"?", title),
            false,
        )?;
        if !confirmed {
            display::notice("Deletion canceled.");
            return Ok(ManageOutcome::Declined { title });
        }

        let removed = self
            .store
            .delete_one(store::BOOKMARKS, &Query::title(&title))
            .with_context(|| format!("Error deleting bookmark '{}'", title))?;
        display::success(&format!("Deleted bookmark: {}", title));
        Ok(ManageOutcome::Deleted { title, removed })
    }

    /// Plain numbered listing; returns how many bookmarks were shown.
    pub fn list_bookmarks(&self) -> Result<usize> {
        let bookmarks = self.load_bookmarks()?;
        if bookmarks.is_empty() {
            display::notice("📂 No bookmarks saved.");
        } else {
            display::print_bookmark_list(&bookmarks);
        }
        Ok(bookmarks.len())
    }

    fn load_bookmarks(&self) -> Result<Vec<TitledEntry>> {
        let records = self
            .store
            .find(store::BOOKMARKS, None)
            .context("Error loading bookmarks")?;
        Ok(TitledEntry::from_records(records))
    }
}

/// First exact title match, else the first result. `None` only when
/// `results` is empty.
pub fn pick_replay<'a>(results: &'a [SearchResult], title: &str) -> Option<(&'a SearchResult, bool)> {
    results
        .iter()
        .find(|r| r.title == title)
        .map(|r| (r, true))
        .or_else(|| results.first().map(|r| (r, false)))
}
