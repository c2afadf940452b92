use crate::models::{SearchResult, TitledEntry};
use colored::*;

pub const NO_AUTHOR: &str = "No Author available";
pub const NO_YEAR: &str = "No Publish Year Available";

/// Author line text, falling back when the catalog has none.
pub fn author_text(item: &SearchResult) -> String {
    item.authors().unwrap_or_else(|| NO_AUTHOR.to_string())
}

pub fn year_text(item: &SearchResult) -> String {
    item.first_publish_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| NO_YEAR.to_string())
}

/// Menu label for a search result.
pub fn choice_label(item: &SearchResult) -> String {
    truncate(&item.title, 100)
}

pub fn print_details(item: &SearchResult) {
    println!();
    println!("{}", "Selected Item Details".bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    println!("  {:14} {}", "Title:".bold(), item.title);
    println!("  {:14} {}", "Author:".bold(), author_text(item));
    println!("  {:14} {}", "Publish Year:".bold(), year_text(item));
    println!();
}

pub fn print_bookmark_list(bookmarks: &[TitledEntry]) {
    println!("\n{}", "Your Bookmarks:".bold().cyan());
    for (i, b) in bookmarks.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, b.title);
    }
}

pub fn notice(msg: &str) {
    println!("{}", msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✔".green().bold(), msg);
}

fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
