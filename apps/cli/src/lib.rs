pub mod commands;
pub mod config;
pub mod db;
pub mod state;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::types::CardKey;
use vocab_core::CardFilter;

use crate::commands::StudyOptions;
use crate::config::AppConfig;
use crate::db::SqliteRepository;
use crate::state::AppState;

/// Spaced-repetition vocabulary trainer.
#[derive(Debug, Parser)]
#[command(name = "vocab", version)]
pub struct Cli {
    /// Path to the SQLite card store (overrides VOCAB_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a CSV with word, meaning, pos, level and rank columns
    Import { path: PathBuf },
    /// Show queue sizes and the cards due now
    Queue {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Review due cards interactively
    Study {
        #[command(flatten)]
        filter: FilterArgs,
        /// Type the meaning instead of flipping the card
        #[arg(long)]
        typed: bool,
        /// Review at most this many cards
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Grade a single card: again, learning or known
    Grade {
        rank: u32,
        word: String,
        grade: String,
    },
    /// Check a typed answer against a card's meaning
    Check {
        rank: u32,
        word: String,
        typed: String,
    },
    /// Reset a card to its freshly imported state
    Reset { rank: u32, word: String },
    /// Show review accuracy per day and part of speech
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Delete every card
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub level: Option<String>,
    /// Part of speech
    #[arg(long)]
    pub pos: Option<String>,
    /// Substring of the word or meaning
    #[arg(long)]
    pub search: Option<String>,
}

impl From<FilterArgs> for CardFilter {
    fn from(args: FilterArgs) -> Self {
        CardFilter {
            level: args.level,
            part_of_speech: args.pos,
            search: args.search,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    tracing::debug!(path = %db_path.display(), "opening card store");
    let repository = SqliteRepository::open(&db_path)
        .with_context(|| format!("cannot open card store {}", db_path.display()))?;
    let state = AppState::new(repository, config.daily_reset_hour);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(&state, cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Run one subcommand against the store, reading answers from stdin.
pub fn dispatch<W: Write>(state: &AppState, command: Command, out: &mut W) -> anyhow::Result<()> {
    let now = Utc::now();
    match command {
        Command::Import { path } => {
            commands::import_file(state, &path, now, out)?;
        }
        Command::Queue { filter, json } => {
            commands::show_queue(state, &filter.into(), now, json, out)?;
        }
        Command::Study {
            filter,
            typed,
            limit,
        } => {
            let options = StudyOptions {
                filter: filter.into(),
                typed,
                limit,
            };
            commands::study(state, &options, now, io::stdin().lock(), out)?;
        }
        Command::Grade { rank, word, grade } => {
            commands::grade_card(state, &CardKey::new(rank, word), &grade, now, out)?;
        }
        Command::Check { rank, word, typed } => {
            commands::check_answer(state, &CardKey::new(rank, word), &typed, now, out)?;
        }
        Command::Reset { rank, word } => {
            commands::reset_card(state, &CardKey::new(rank, word), now, out)?;
        }
        Command::Stats { json } => {
            commands::show_stats(state, json, out)?;
        }
        Command::Clear { yes } => {
            commands::clear_cards(state, yes, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_study_flags() {
        let cli = Cli::try_parse_from([
            "vocab", "--db", "cards.db", "study", "--typed", "--limit", "5", "--pos", "noun",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("cards.db")));
        match cli.command {
            Command::Study {
                filter,
                typed,
                limit,
            } => {
                assert!(typed);
                assert_eq!(limit, Some(5));
                let filter: CardFilter = filter.into();
                assert_eq!(filter.part_of_speech.as_deref(), Some("noun"));
                assert_eq!(filter.level, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_grade_arguments() {
        let cli = Cli::try_parse_from(["vocab", "grade", "12", "가격", "known"]).unwrap();
        match cli.command {
            Command::Grade { rank, word, grade } => {
                assert_eq!(rank, 12);
                assert_eq!(word, "가격");
                assert_eq!(grade, "known");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
