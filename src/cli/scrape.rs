//! Scrape command - build a starter roster from commit author emails

use crate::git::GitHistory;
use crate::registry::roster;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use std::path::Path;
use tracing::info;

pub fn run(
    path: &Path,
    output: &Path,
    since: Option<DateTime<Utc>>,
    rev: Option<&str>,
    suggestions: usize,
) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let history = GitHistory::open(&repo_path)?;
    let emails = history.author_emails(rev, since)?;
    info!("found {} distinct author emails", emails.len());

    let csv = roster::scrape_rows(&emails, suggestions);
    std::fs::write(output, csv)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!(
        "Wrote {} emails to {}",
        emails.len(),
        style(output.display()).cyan()
    );
    eprintln!("Fill in the team column, then run `changewatch watch`.");
    Ok(())
}
