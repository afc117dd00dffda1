//! Per-team ranked hotlists of most-changed files

use crate::engine::AttributionTable;
use crate::models::HotlistEntry;

/// Default hotlist length, small enough to graph legibly.
pub const DEFAULT_MAX_ENTRIES: usize = 25;

/// Rank the files a team changed most, non-increasing by count.
///
/// Files the team never changed are excluded, the result is truncated to
/// `max_entries`. Tie order among equal counts follows the table's file
/// order, which is fixed for a fixed ingestion, so repeated calls return
/// the same sequence.
pub fn hotlist(table: &AttributionTable, team: &str, max_entries: usize) -> Vec<HotlistEntry> {
    let mut entries: Vec<HotlistEntry> = table
        .files()
        .map(|file| HotlistEntry {
            file: file.to_string(),
            count: table.team_count(file, team),
        })
        .filter(|entry| entry.count > 0)
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(max_entries);
    entries
}
