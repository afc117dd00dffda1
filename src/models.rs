//! Core data models for changewatch
//!
//! These models are shared between the git backend, the attribution
//! engine, and the reporters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committer-touched file in one commit.
///
/// Immutable once created; consumed exactly once by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Repo-relative path of the touched file
    pub file: String,
    /// Author email, lowercased
    pub author_email: String,
    /// First line of the commit message
    pub summary: String,
    /// Full commit hash
    pub commit: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// Lines added to this file in this commit
    pub insertions: usize,
    /// Lines deleted from this file in this commit
    pub deletions: usize,
}

/// One entry in a team hotlist: a file and that team's change count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotlistEntry {
    pub file: String,
    pub count: u64,
}

/// Total change count for one developer, grouped by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperTotal {
    pub name: String,
    pub changes: u64,
}

/// Per-team section of a watch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub name: String,
    pub members: usize,
    pub hotlist: Vec<HotlistEntry>,
}

/// First and last commit timestamps of the queried range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueriedRange {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

/// Full result of one watch run, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchReport {
    pub repo: String,
    pub pattern: String,
    /// None when the queried range contained no commits
    pub range: Option<QueriedRange>,
    pub commit_count: usize,
    pub event_count: usize,
    pub teams: Vec<TeamSummary>,
    pub developer_totals: Vec<DeveloperTotal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets: Option<crate::engine::tickets::TicketGroups>,
}
