//! Ticket tracker collaborators
//!
//! The engine only needs one operation from a tracker: map a ticket key to
//! its type name. Lookups may fail for malformed or deleted keys; callers
//! catch the error at the boundary and skip that one reference, failures
//! here are never fatal to a run.

mod jira;

pub use jira::JiraTracker;

use thiserror::Error;

/// Errors from a ticket tracker lookup.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("ticket {key} not found (HTTP {status})")]
    NotFound { key: String, status: u16 },

    #[error("tracker request failed: {0}")]
    Request(#[from] ureq::Error),

    #[error("unexpected tracker response: {0}")]
    Parse(String),
}

/// Maps a ticket key to its type name ("Bug", "Story", ...).
pub trait TicketTracker: Sync {
    fn lookup_type(&self, key: &str) -> Result<String, TrackerError>;
}
