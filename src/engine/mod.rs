//! Attribution engine
//!
//! Consumes change events in commit order, accumulates per-file counts by
//! author and by team, and derives hotlists and ticket correlations as pure
//! read-only passes over the accumulated table. Registry construction is a
//! separate phase that completes before ingestion begins; nothing in here
//! mutates the registry.
//!
//! By construction the engine has no failure path: absent keys read as zero
//! or empty, counters only ever increment, and sorts cannot fail.

pub mod aggregator;
pub mod hotlist;
pub mod tickets;

pub use aggregator::{AttributionAggregator, AttributionTable};
pub use hotlist::hotlist;
pub use tickets::{correlate, extract_ticket_key, TicketGroups};
