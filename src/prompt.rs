use anyhow::Result;
use colored::*;
use std::io::{BufRead, Write};

/// Presents choices to the user and returns what they picked.
pub trait Prompter {
    /// Index into `choices` of the selected item.
    fn select(&self, message: &str, choices: &[String]) -> Result<usize>;

    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Numbered menus on stderr, answers read line by line from stdin.
///
/// End of input selects the last choice (callers put Exit/Cancel there) and
/// answers confirmations with their default.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&self, message: &str, choices: &[String]) -> Result<usize> {
        anyhow::ensure!(!choices.is_empty(), "Nothing to choose from");
        let mut err = std::io::stderr().lock();

        writeln!(err, "{} {}", "?".green().bold(), message.bold())?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(err, "  {:>3}) {}", (i + 1).to_string().cyan(), choice)?;
        }

        loop {
            write!(err, "{} ", format!("[1-{}]", choices.len()).dimmed())?;
            err.flush()?;

            let Some(line) = read_line()? else {
                writeln!(err)?;
                return Ok(choices.len() - 1);
            };
            match parse_choice(&line, choices.len()) {
                Some(idx) => return Ok(idx),
                None => writeln!(
                    err,
                    "{}",
                    format!("Please enter a number between 1 and {}", choices.len()).yellow()
                )?,
            }
        }
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let mut err = std::io::stderr().lock();
        let hint = if default { "(Y/n)" } else { "(y/N)" };

        loop {
            write!(err, "{} {} {} ", "?".green().bold(), message.bold(), hint.dimmed())?;
            err.flush()?;

            let Some(line) = read_line()? else {
                writeln!(err)?;
                return Ok(default);
            };
            match parse_confirm(&line, default) {
                Some(answer) => return Ok(answer),
                None => writeln!(err, "{}", "Please answer y or n".yellow())?,
            }
        }
    }
}

fn read_line() -> Result<Option<String>> {
    let mut line = String::new();
    let n = std::io::stdin().lock().read_line(&mut line)?;
    Ok(if n == 0 { None } else { Some(line) })
}

/// 1-based menu input to a 0-based index.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

pub fn parse_confirm(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
