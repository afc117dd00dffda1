//! Team roster CSV loading and scraping
//!
//! A roster row is `primaryEmail,teamName,"alias1,alias2,..."`. Rows are
//! applied in file order, one `assign_team` per row, so a later row for the
//! same developer wins. `scrape` goes the other way: it turns the set of
//! author emails seen in history into a starter roster with the team column
//! left blank and nearest-alias suggestions prefilled for human review.

use crate::registry::{Developer, IdentityRegistry};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Load a registry from a roster CSV file.
pub fn load_registry(path: &Path) -> Result<IdentityRegistry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster CSV: {}", path.display()))?;
    Ok(parse_registry(&content))
}

/// Parse roster rows out of CSV text. Malformed rows are skipped with a
/// warning, never fatal.
pub fn parse_registry(content: &str) -> IdentityRegistry {
    let mut registry = IdentityRegistry::new();

    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_csv_line(line);
        // header row from a scraped roster
        if lineno == 0 && fields.first().is_some_and(|f| f.eq_ignore_ascii_case("email")) {
            continue;
        }
        let Some(email) = fields.first().map(|f| f.trim()).filter(|f| !f.is_empty()) else {
            warn!("roster line {}: missing primary email, skipped", lineno + 1);
            continue;
        };
        let Some(team) = fields.get(1).map(|f| f.trim()).filter(|f| !f.is_empty()) else {
            debug!("roster line {}: no team for {}, skipped", lineno + 1, email);
            continue;
        };

        let mut emails = vec![email.to_string()];
        if let Some(aliases) = fields.get(2) {
            emails.extend(
                aliases
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(String::from),
            );
        }
        if let Some(developer) = Developer::new(emails) {
            registry.assign_team(developer, team);
        }
    }

    registry
}

/// Build starter roster rows from scraped author emails and render as CSV.
///
/// Each email gets up to `max_suggestions` nearest other emails (by edit
/// distance) in the alias column as merge candidates.
pub fn scrape_rows(emails: &BTreeSet<String>, max_suggestions: usize) -> String {
    let mut out = String::from("Email,Team,\"Aliases (emails, comma separated)\"\n");
    for email in emails {
        let suggestions = nearest_aliases(email, emails, max_suggestions).join(",");
        out.push_str(&escape_field(email));
        out.push_str(",,");
        out.push_str(&escape_field(&suggestions));
        out.push('\n');
    }
    out
}

/// Rank every other email by edit distance from `email`, closest first.
fn nearest_aliases(email: &str, emails: &BTreeSet<String>, max: usize) -> Vec<String> {
    let mut others: Vec<&String> = emails.iter().filter(|e| e.as_str() != email).collect();
    others.sort_by_key(|e| edit_distance(email, e));
    others.into_iter().take(max).cloned().collect()
}

/// Levenshtein distance, single-row DP.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { prev } else { prev + 1 };
            prev = row[j + 1];
            row[j + 1] = cost.min(row[j] + 1).min(prev + 1);
        }
    }
    row[b.len()]
}

/// Split one CSV line into fields, honoring double quotes with `""` escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Escape a CSV field (handle commas, quotes, newlines).
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_line_quoted() {
        assert_eq!(
            vec!["a@x.com", "alpha", "b@x.com,c@x.com"],
            parse_csv_line("a@x.com,alpha,\"b@x.com,c@x.com\"")
        );
        assert_eq!(vec!["plain", "", "end"], parse_csv_line("plain,,end"));
        assert_eq!(vec!["say \"hi\""], parse_csv_line("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_parse_registry_rows_in_order() {
        let csv = "\
alice@restaurant.com,alpha,
bob@dogs.com,beta,
carol@christmas.com,alpha,\"anonymous@remailer.com,carol@work.com\"
";
        let registry = parse_registry(csv);
        assert_eq!(2, registry.team_count());
        assert_eq!(2, registry.team_size("alpha"));
        assert_eq!(1, registry.team_size("beta"));

        let (carol, team) = registry.find_by_email("anonymous@remailer.com").unwrap();
        assert_eq!("alpha", team);
        assert_eq!("carol", carol.name());
        assert_eq!(3, carol.aliases().count());
    }

    #[test]
    fn test_parse_registry_skips_header_and_blank_teams() {
        let csv = "\
Email,Team,\"Aliases (emails, comma separated)\"
alice@restaurant.com,alpha,
pending@nowhere.com,,
";
        let registry = parse_registry(csv);
        assert_eq!(1, registry.developer_count());
        assert!(registry.find_by_email("pending@nowhere.com").is_none());
        assert!(registry.find_by_email("email").is_none());
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(0, edit_distance("abc", "abc"));
        assert_eq!(1, edit_distance("abc", "abd"));
        assert_eq!(3, edit_distance("", "abc"));
        assert_eq!(3, edit_distance("kitten", "sitting"));
    }

    #[test]
    fn test_scrape_rows_suggests_nearest_first() {
        let emails: BTreeSet<String> = [
            "alice@x.com".to_string(),
            "alice@y.com".to_string(),
            "zzz@qqq.org".to_string(),
        ]
        .into_iter()
        .collect();

        let csv = scrape_rows(&emails, 5);
        let alice_row = csv
            .lines()
            .find(|l| l.starts_with("alice@x.com"))
            .unwrap();
        // nearest suggestion comes before the distant one
        let fields = parse_csv_line(alice_row);
        assert_eq!("alice@y.com,zzz@qqq.org", fields[2]);
        // never suggests itself
        assert!(!fields[2].contains("alice@x.com,"));
    }
}
