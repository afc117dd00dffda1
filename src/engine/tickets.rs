//! Ticket extraction and per-file ticket-type correlation

use crate::models::ChangeEvent;
use crate::tracker::TicketTracker;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Pull a candidate ticket key from the first line of a commit message.
///
/// Takes the first whitespace token verbatim; `None` for merge commits
/// (literal leading `Merge`) and for tokens without a `-` separator, which
/// catches most free-text summaries. This is a best-effort heuristic, not a
/// key grammar: malformed keys pass through and get rejected by the tracker
/// lookup instead.
pub fn extract_ticket_key(first_line: &str) -> Option<&str> {
    let token = first_line.split_whitespace().next()?;
    if token == "Merge" || !token.contains('-') {
        return None;
    }
    Some(token)
}

/// Ticket references for one file, grouped by ticket type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTickets {
    /// Every change event for the file, whether or not a key was extracted
    pub count: u64,
    /// Ticket type -> keys that resolved to that type, in event order
    pub by_type: BTreeMap<String, Vec<String>>,
}

/// Per-file ticket groupings for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketGroups {
    pub files: BTreeMap<String, FileTickets>,
}

/// Group each file's ticket references by ticket type.
///
/// Tracker lookups are the dominant cost here, so independent per-file
/// lookups run in parallel; grouping is per-file, so completion order cannot
/// change the result. A failed lookup drops that one key from the typed
/// grouping and nothing else.
pub fn correlate(
    events_by_file: &BTreeMap<String, Vec<ChangeEvent>>,
    tracker: &(dyn TicketTracker + Sync),
) -> TicketGroups {
    let files = events_by_file
        .par_iter()
        .map(|(file, events)| (file.clone(), correlate_file(events, tracker)))
        .collect();
    TicketGroups { files }
}

fn correlate_file(events: &[ChangeEvent], tracker: &(dyn TicketTracker + Sync)) -> FileTickets {
    let mut tickets = FileTickets::default();
    for event in events {
        tickets.count += 1;
        let Some(key) = extract_ticket_key(&event.summary) else {
            continue;
        };
        match tracker.lookup_type(key) {
            Ok(ticket_type) => {
                tickets.by_type.entry(ticket_type).or_default().push(key.to_string());
            }
            Err(err) => {
                debug!("skipping ticket {}: {}", key, err);
            }
        }
    }
    tickets
}
