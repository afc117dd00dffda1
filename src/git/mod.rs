//! Git history extraction
//!
//! Wraps libgit2 to produce the ordered change-event stream the attribution
//! engine consumes: commits walked ascending by commit time, each exposing
//! the author email, the first message line, and per-file line deltas
//! against the first parent.

pub mod history;

pub use history::{matching_events, CommitInfo, FileDelta, GitHistory};
