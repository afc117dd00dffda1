//! Graphviz reporter
//!
//! One undirected graph per team: a team node, a node per hotlist file, and
//! an edge per file labeled with the team's change count. `render` emits all
//! teams into one stream; `render_team` produces a single team's graph for
//! per-team `<team>.dot` files.

use crate::models::{TeamSummary, WatchReport};
use anyhow::Result;

/// Render every team's hotlist graph, one graph block per team
pub fn render(report: &WatchReport) -> Result<String> {
    let mut out = String::new();
    for team in &report.teams {
        out.push_str(&render_team(team));
    }
    Ok(out)
}

/// Render one team's hotlist graph
pub fn render_team(team: &TeamSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("graph {} {{\n", quote(&team.name)));
    out.push_str(&format!("    {};\n", quote(&team.name)));
    for entry in &team.hotlist {
        out.push_str(&format!("    {};\n", quote(&entry.file)));
        out.push_str(&format!(
            "    {} -- {} [label={}];\n",
            quote(&team.name),
            quote(&entry.file),
            entry.count
        ));
    }
    out.push_str("}\n");
    out
}

/// Quote a DOT identifier, escaping embedded quotes
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HotlistEntry;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_render_team_edges_and_labels() {
        let team = TeamSummary {
            name: "alpha".into(),
            members: 2,
            hotlist: vec![HotlistEntry { file: "src/a.rs".into(), count: 3 }],
        };
        let out = render_team(&team);
        assert!(out.starts_with("graph \"alpha\" {"));
        assert!(out.contains("\"alpha\" -- \"src/a.rs\" [label=3];"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_render_all_teams() {
        let out = render(&test_report()).unwrap();
        assert_eq!(2, out.matches("graph ").count());
        // empty hotlist still yields the team node
        assert!(out.contains("graph \"beta\" {\n    \"beta\";\n}"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!("\"a\\\"b\"", quote("a\"b"));
    }
}
