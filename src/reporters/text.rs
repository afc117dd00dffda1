//! Text (terminal) reporter with colors and formatting

use crate::models::WatchReport;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";

/// Render report as formatted terminal output
pub fn render(report: &WatchReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Changewatch{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Repo: {CYAN}{}{RESET}  Pattern: {CYAN}{}{RESET}\n",
        report.repo, report.pattern
    ));
    match &report.range {
        Some(range) => out.push_str(&format!(
            "Queried range: {} <-> {}\n",
            range.first.to_rfc3339(),
            range.last.to_rfc3339()
        )),
        None => out.push_str(&format!("{YELLOW}No commits in the queried range{RESET}\n")),
    }
    out.push_str(&format!(
        "Commits: {}  Matching changes: {}\n\n",
        report.commit_count, report.event_count
    ));

    // Hotlists
    for team in &report.teams {
        out.push_str(&format!(
            "{BOLD}{}{RESET} {DIM}({} members){RESET}\n",
            team.name, team.members
        ));
        if team.hotlist.is_empty() {
            out.push_str(&format!("  {DIM}no matching changes{RESET}\n"));
        }
        for entry in &team.hotlist {
            out.push_str(&format!("  {:>5}  {}\n", entry.count, entry.file));
        }
        out.push('\n');
    }

    // Developer totals
    if !report.developer_totals.is_empty() {
        out.push_str(&format!("{BOLD}CHANGES BY DEVELOPER{RESET}\n"));
        for total in &report.developer_totals {
            out.push_str(&format!("  {:>5}  {}\n", total.changes, total.name));
        }
        out.push('\n');
    }

    // Ticket groupings
    if let Some(tickets) = &report.tickets {
        out.push_str(&format!("{BOLD}TICKETS BY FILE{RESET}\n"));
        for (file, group) in &tickets.files {
            out.push_str(&format!(
                "  {} {DIM}({} changes){RESET}\n",
                file, group.count
            ));
            for (ticket_type, keys) in &group.by_type {
                out.push_str(&format!(
                    "    {CYAN}{}{RESET}: {}\n",
                    ticket_type,
                    keys.join(", ")
                ));
            }
        }
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tickets::{FileTickets, TicketGroups};
    use crate::reporters::tests::test_report;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_hotlists_and_totals() {
        let out = render(&test_report()).unwrap();
        assert!(out.contains("src/engine.rs"));
        assert!(out.contains("alpha"));
        assert!(out.contains("no matching changes"));
        assert!(out.contains("alice"));
        assert!(!out.contains("TICKETS BY FILE"));
    }

    #[test]
    fn test_render_empty_range() {
        let mut report = test_report();
        report.range = None;
        report.teams.clear();
        let out = render(&report).unwrap();
        assert!(out.contains("No commits in the queried range"));
    }

    #[test]
    fn test_render_tickets_section() {
        let mut report = test_report();
        let mut files = BTreeMap::new();
        files.insert(
            "src/engine.rs".to_string(),
            FileTickets {
                count: 3,
                by_type: BTreeMap::from([(
                    "Bug".to_string(),
                    vec!["BUG-1".to_string(), "BUG-2".to_string()],
                )]),
            },
        );
        report.tickets = Some(TicketGroups { files });

        let out = render(&report).unwrap();
        assert!(out.contains("TICKETS BY FILE"));
        assert!(out.contains("BUG-1, BUG-2"));
    }
}
