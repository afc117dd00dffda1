//! Per-file change counting by author and by team
//!
//! The table is an explicit owned aggregate: created empty at the start of a
//! run, populated once during ingestion, then handed by reference to the
//! ranking and correlation passes. BTreeMaps keep iteration deterministic
//! run-to-run for a fixed event order.

use crate::models::DeveloperTotal;
use crate::registry::IdentityRegistry;
use std::collections::BTreeMap;

/// Accumulated change counts: `file -> author-email -> count` plus the
/// team-keyed view derived through the registry at record time.
#[derive(Debug, Default)]
pub struct AttributionTable {
    by_author: BTreeMap<String, BTreeMap<String, u64>>,
    by_team: BTreeMap<String, BTreeMap<String, u64>>,
}

impl AttributionTable {
    /// Per-author counts for one file. Empty map for an unknown file.
    pub fn totals_by_author(&self, file: &str) -> BTreeMap<String, u64> {
        self.by_author.get(file).cloned().unwrap_or_default()
    }

    /// Per-team counts for one file. Empty map for an unknown file.
    pub fn totals_by_team(&self, file: &str) -> BTreeMap<String, u64> {
        self.by_team.get(file).cloned().unwrap_or_default()
    }

    /// Every file with at least one recorded change.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.by_author.keys().map(String::as_str)
    }

    /// One team's count for one file, zero if absent.
    pub fn team_count(&self, file: &str, team: &str) -> u64 {
        self.by_team
            .get(file)
            .and_then(|counts| counts.get(team))
            .copied()
            .unwrap_or(0)
    }
}

/// Ingests change events against a registry built beforehand.
pub struct AttributionAggregator<'r> {
    registry: &'r IdentityRegistry,
    table: AttributionTable,
}

impl<'r> AttributionAggregator<'r> {
    pub fn new(registry: &'r IdentityRegistry) -> Self {
        Self {
            registry,
            table: AttributionTable::default(),
        }
    }

    /// Count one change of `file` by `author_email`.
    ///
    /// The per-author counter always increments. The per-team counter
    /// increments only when the registry resolves the email; a resolution
    /// miss is silent and intentional, the event still counts toward the
    /// author totals.
    pub fn record(&mut self, file: &str, author_email: &str) {
        let email = author_email.trim().to_lowercase();

        *self
            .table
            .by_author
            .entry(file.to_string())
            .or_default()
            .entry(email.clone())
            .or_insert(0) += 1;

        if let Some((_, team)) = self.registry.find_by_email(&email) {
            *self
                .table
                .by_team
                .entry(file.to_string())
                .or_default()
                .entry(team.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Total changes across all files per developer display name.
    ///
    /// Only emails the registry resolves contribute; aliases of the same
    /// developer collapse into one row. Sorted by descending count, ties in
    /// name order.
    pub fn totals_by_developer(&self) -> Vec<DeveloperTotal> {
        let mut by_name: BTreeMap<String, u64> = BTreeMap::new();
        for counts in self.table.by_author.values() {
            for (email, count) in counts {
                if let Some((developer, _)) = self.registry.find_by_email(email) {
                    *by_name.entry(developer.name().to_string()).or_insert(0) += count;
                }
            }
        }
        let mut totals: Vec<DeveloperTotal> = by_name
            .into_iter()
            .map(|(name, changes)| DeveloperTotal { name, changes })
            .collect();
        totals.sort_by(|a, b| b.changes.cmp(&a.changes).then_with(|| a.name.cmp(&b.name)));
        totals
    }

    /// Finish ingestion; the table is read-only from here on.
    pub fn into_table(self) -> AttributionTable {
        self.table
    }

    pub fn table(&self) -> &AttributionTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Developer;

    fn registry() -> IdentityRegistry {
        let mut registry = IdentityRegistry::new();
        registry.assign_team(
            Developer::new(["alice@x.com", "123+alice@users.noreply.github.com"]).unwrap(),
            "alpha",
        );
        registry.assign_team(Developer::new(["bob@y.com"]).unwrap(), "beta");
        registry
    }

    #[test]
    fn test_author_totals_conserve_record_calls() {
        let registry = registry();
        let mut agg = AttributionAggregator::new(&registry);
        agg.record("f1", "alice@x.com");
        agg.record("f1", "alice@x.com");
        agg.record("f1", "bob@y.com");
        agg.record("f1", "stranger@nowhere.com");
        agg.record("f2", "bob@y.com");

        let f1 = agg.table().totals_by_author("f1");
        assert_eq!(4u64, f1.values().sum::<u64>());
        assert_eq!(Some(&2), f1.get("alice@x.com"));
        assert_eq!(1u64, agg.table().totals_by_author("f2").values().sum::<u64>());
    }

    #[test]
    fn test_email_case_normalized() {
        let registry = registry();
        let mut agg = AttributionAggregator::new(&registry);
        agg.record("f1", "Alice@X.com");
        agg.record("f1", "alice@x.com");

        let f1 = agg.table().totals_by_author("f1");
        assert_eq!(Some(&2), f1.get("alice@x.com"));
        assert_eq!(2, agg.table().team_count("f1", "alpha"));
    }

    #[test]
    fn test_unresolved_email_counts_for_author_only() {
        let registry = registry();
        let mut agg = AttributionAggregator::new(&registry);
        agg.record("f1", "stranger@nowhere.com");

        assert_eq!(1u64, agg.table().totals_by_author("f1").values().sum::<u64>());
        assert!(agg.table().totals_by_team("f1").is_empty());
        assert!(agg.totals_by_developer().is_empty());
    }

    #[test]
    fn test_unknown_file_reads_empty() {
        let registry = registry();
        let agg = AttributionAggregator::new(&registry);
        assert!(agg.table().totals_by_author("ghost").is_empty());
        assert!(agg.table().totals_by_team("ghost").is_empty());
        assert_eq!(0, agg.table().team_count("ghost", "alpha"));
    }

    #[test]
    fn test_totals_by_developer_collapses_aliases() {
        let registry = registry();
        let mut agg = AttributionAggregator::new(&registry);
        agg.record("f1", "alice@x.com");
        agg.record("f2", "123+alice@users.noreply.github.com");
        agg.record("f2", "bob@y.com");
        agg.record("f3", "stranger@nowhere.com");

        let totals = agg.totals_by_developer();
        assert_eq!(2, totals.len());
        assert_eq!("alice", totals[0].name);
        assert_eq!(2, totals[0].changes);
        assert_eq!("bob", totals[1].name);
        assert_eq!(1, totals[1].changes);
    }
}
