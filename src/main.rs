use anyhow::Result;
use bookfind::catalog::OpenLibraryClient;
use bookfind::config::Config;
use bookfind::flow::{App, HistoryKind};
use bookfind::prompt::TerminalPrompter;
use bookfind::telemetry;
use clap::{CommandFactory, Parser, Subcommand};
use colored::*;
use tracing::{debug, error};

#[derive(Parser)]
#[command(
    name = "bookfind",
    about = "bookfind - Search Open Library, keep history and bookmarks",
    version
)]
struct Cli {
    /// Directory holding the collection files [default: ./mock_database if
    /// present, else mock_database next to the executable]
    #[arg(long, global = true, value_name = "DIR")]
    db: Option<String>,

    /// Catalog base URL (default: https://openlibrary.org)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Fail on network errors instead of treating them as no results
    #[arg(long, global = true)]
    strict: bool,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a keyword using the API
    Search {
        /// Keyword to search for
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        keyword: String,
    },

    /// Show past searched keywords or selected results
    History {
        #[arg(value_enum)]
        kind: HistoryKind,
    },

    /// View and manage saved bookmarks
    Bookmarks {
        /// Only print the bookmarks, no prompts
        #[arg(long, short)]
        list: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let cfg = Config::new(
        cli.db.as_deref(),
        cli.api_url.as_deref(),
        cli.timeout,
        cli.strict,
    )?;
    let client = OpenLibraryClient::new(&cfg.api_url, cfg.timeout)?;
    let app = App::new(cfg.store(), client, TerminalPrompter).strict(cfg.strict);

    match command {
        Commands::Search { keyword } => {
            let outcome = app.search(&keyword)?;
            debug!(?outcome, "search finished");
        }

        Commands::History { kind } => {
            let outcome = app.history(kind)?;
            debug!(?outcome, "history finished");
        }

        Commands::Bookmarks { list } => {
            if list {
                app.list_bookmarks()?;
            } else {
                let outcome = app.manage_bookmarks()?;
                debug!(?outcome, "bookmarks finished");
            }
        }
    }

    Ok(())
}
