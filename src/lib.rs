//! Changewatch - team-aware git change attribution
//!
//! Attributes file change history to developers and teams, ranks each
//! team's most-changed files, and correlates changes with ticket records.
//!
//! The crate splits into an identity/attribution engine (`registry`,
//! `engine`) and its collaborators at the boundaries: the git backend
//! (`git`), the ticket tracker (`tracker`), and the reporters
//! (`reporters`).

pub mod cli;
pub mod config;
pub mod engine;
pub mod git;
pub mod models;
pub mod registry;
pub mod reporters;
pub mod tracker;
