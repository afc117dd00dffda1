//! Watch command - attribute changes, rank hotlists, correlate tickets
//!
//! Two strict phases: the registry is fully built from the roster before any
//! event is aggregated, then ranking and correlation run as read-only passes
//! over the finished table.

use crate::config::UserConfig;
use crate::engine::{self, AttributionAggregator};
use crate::git::{matching_events, GitHistory};
use crate::models::{QueriedRange, TeamSummary, WatchReport};
use crate::registry::roster;
use crate::reporters::{self, OutputFormat};
use crate::tracker::JiraTracker;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

pub struct WatchOptions {
    pub path: PathBuf,
    pub pattern: String,
    pub roster: PathBuf,
    pub since: Option<DateTime<Utc>>,
    pub rev: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub max_entries: usize,
    pub tickets: bool,
}

pub fn run(options: WatchOptions) -> Result<()> {
    let repo_path = options
        .path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", options.path.display()))?;
    let format = OutputFormat::from_str(&options.format)?;

    eprintln!("Repo: {}", style(repo_path.display()).cyan());
    eprintln!("Matching changes to: {}", style(&options.pattern).cyan());

    // Phase 1: registry construction, complete before ingestion starts
    eprintln!(
        "Loading team data from: {}",
        style(options.roster.display()).cyan()
    );
    let registry = roster::load_registry(&options.roster)?;
    for team in registry.teams() {
        eprintln!("\t{} : {} members", team, registry.team_size(team));
    }
    eprintln!("Loaded {} teams", registry.team_count());

    // Phase 2: ingestion in commit order
    let history = GitHistory::open(&repo_path)?;
    let commits = history.commits_since(options.rev.as_deref(), options.since)?;

    let bar = ProgressBar::new(commits.len() as u64);
    bar.set_style(progress_style());
    bar.set_message("indexing commits");

    let mut aggregator = AttributionAggregator::new(&registry);
    let mut events = Vec::new();
    for commit in &commits {
        for event in matching_events(std::slice::from_ref(commit), &options.pattern) {
            aggregator.record(&event.file, &event.author_email);
            events.push(event);
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    info!(
        "indexed {} commits, {} matching change events",
        commits.len(),
        events.len()
    );

    let range = match (commits.first(), commits.last()) {
        (Some(first), Some(last)) => Some(QueriedRange {
            first: first.timestamp,
            last: last.timestamp,
        }),
        _ => None,
    };

    // Phase 3: read-only ranking and correlation
    let developer_totals = aggregator.totals_by_developer();
    let table = aggregator.into_table();
    let teams: Vec<TeamSummary> = registry
        .teams()
        .map(|team| TeamSummary {
            name: team.to_string(),
            members: registry.team_size(team),
            hotlist: engine::hotlist(&table, team, options.max_entries),
        })
        .collect();

    let tickets = if options.tickets {
        correlate_tickets(&events)
    } else {
        None
    };

    let report = WatchReport {
        repo: repo_path.display().to_string(),
        pattern: options.pattern.clone(),
        range,
        commit_count: commits.len(),
        event_count: events.len(),
        teams,
        developer_totals,
        tickets,
    };

    write_report(&report, format, options.output.as_deref())
}

/// Group events by file and correlate through the configured tracker.
/// Missing tracker config disables correlation with a warning, never fails.
fn correlate_tickets(
    events: &[crate::models::ChangeEvent],
) -> Option<engine::tickets::TicketGroups> {
    let config = UserConfig::load().ok()?;
    let Some(tracker) = JiraTracker::new(&config.tracker) else {
        warn!("--tickets requested but no tracker is configured, skipping correlation");
        return None;
    };

    let mut events_by_file: BTreeMap<String, Vec<crate::models::ChangeEvent>> = BTreeMap::new();
    for event in events {
        events_by_file
            .entry(event.file.clone())
            .or_default()
            .push(event.clone());
    }
    Some(engine::correlate(&events_by_file, &tracker))
}

fn write_report(
    report: &WatchReport,
    format: OutputFormat,
    output: Option<&std::path::Path>,
) -> Result<()> {
    // dot into a directory: one <team>.dot per team, like the graphs the
    // report is meant to feed
    if format == OutputFormat::Dot {
        if let Some(dir) = output.filter(|p| p.is_dir()) {
            for team in &report.teams {
                let path = dir.join(format!("{}.dot", sanitize_filename(&team.name)));
                std::fs::write(&path, reporters::render_team_dot(team))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("wrote {}", path.display());
            }
            return Ok(());
        }
    }

    let rendered = reporters::render(report, format)?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Keep team-derived filenames on the safe side
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!("alpha", sanitize_filename("alpha"));
        assert_eq!("alpha-prime", sanitize_filename("alpha-prime"));
        assert_eq!("a_b_c", sanitize_filename("a/b c"));
    }
}
