//! CLI command definitions and handlers

mod scrape;
mod watch;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Changewatch - team-aware git change attribution
///
/// Counts file changes per author and per team, ranks each team's
/// most-changed files, and correlates changes with ticket records.
#[derive(Parser, Debug)]
#[command(name = "changewatch")]
#[command(
    version,
    about = "Team-aware git change attribution — per-team hotlists, developer totals, ticket correlation",
    after_help = "\
Examples:
  changewatch watch . src --since 2026-01-01 --roster team.csv
  changewatch watch . src --roster team.csv --format dot -o graphs/
  changewatch watch . src --roster team.csv --format json --tickets
  changewatch scrape . users.csv --since 2026-01-01"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attribute matching file changes to developers and teams
    Watch {
        /// Path to git repository
        path: PathBuf,

        /// Substring to match against changed file paths
        pattern: String,

        /// Roster CSV with (email, team, aliases) rows
        #[arg(long)]
        roster: PathBuf,

        /// Examine commits since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Branch, tag, or commit to walk from (default: HEAD)
        #[arg(long)]
        rev: Option<String>,

        /// Output format: text, json, dot
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "dot"])]
        format: String,

        /// Output file (default: stdout). With --format dot, an existing
        /// directory here gets one <team>.dot file per team
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Maximum hotlist entries per team
        #[arg(long, default_value = "25")]
        max_entries: usize,

        /// Correlate changes with ticket types (needs tracker config)
        #[arg(long)]
        tickets: bool,
    },

    /// Write a starter roster CSV from author emails seen in history
    Scrape {
        /// Path to git repository
        path: PathBuf,

        /// File to write the roster CSV to
        output: PathBuf,

        /// Examine commits since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Branch, tag, or commit to walk from (default: HEAD)
        #[arg(long)]
        rev: Option<String>,

        /// Nearest-alias suggestions per email
        #[arg(long, default_value = "5")]
        suggestions: usize,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Watch {
            path,
            pattern,
            roster,
            since,
            rev,
            format,
            output,
            max_entries,
            tickets,
        } => watch::run(watch::WatchOptions {
            path,
            pattern,
            roster,
            since: parse_since(since.as_deref())?,
            rev,
            format,
            output,
            max_entries,
            tickets,
        }),
        Commands::Scrape {
            path,
            output,
            since,
            rev,
            suggestions,
        } => scrape::run(&path, &output, parse_since(since.as_deref())?, rev.as_deref(), suggestions),
    }
}

/// Parse a `--since YYYY-MM-DD` date as midnight UTC
fn parse_since(since: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    since
        .map(|s| {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid --since date '{}', expected YYYY-MM-DD", s))?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .context("Invalid midnight timestamp")?;
            Ok(midnight.and_utc())
        })
        .transpose()
}
