//! End-to-end pipeline tests
//!
//! Build a throwaway git repository, load a roster, run the full
//! registry -> aggregation -> ranking -> correlation pipeline through the
//! library API, and check the rendered output.

use changewatch::engine::{self, AttributionAggregator};
use changewatch::git::{matching_events, GitHistory};
use changewatch::registry::roster;
use changewatch::tracker::{TicketTracker, TrackerError};
use git2::Repository;
use std::collections::BTreeMap;
use std::path::Path;

fn commit_file(
    repo: &Repository,
    dir: &Path,
    name: &str,
    content: &str,
    email: &str,
    message: &str,
    epoch: i64,
) {
    let sig = git2::Signature::new("Test User", email, &git2::Time::new(epoch, 0)).unwrap();
    let tree_id = {
        let mut index = repo.index().unwrap();
        std::fs::write(dir.join(name), content).unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        index.write_tree().unwrap()
    };
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

/// Three commits by alice (two aliases) and one by bob, all touching f1.rs,
/// one commit touching an unmatched file.
fn build_repo(dir: &Path) {
    let repo = Repository::init(dir).unwrap();
    let mut epoch = 1_700_000_000;
    for (file, email, message) in [
        ("f1.rs", "a@x.com", "BUG-1 fix crash\n\ndetails"),
        ("f1.rs", "999+alice@users.noreply.github.com", "FEAT-2 widget"),
        ("f1.rs", "a@x.com", "Merge branch 'develop'"),
        ("f1.rs", "b@y.com", "tidy whitespace"),
        ("notes.md", "b@y.com", "BUG-3 update notes"),
    ] {
        epoch += 100;
        commit_file(&repo, dir, file, &format!("{} {}", message, epoch), email, message, epoch);
    }
}

const ROSTER: &str = "\
a@x.com,alpha,999+alice@users.noreply.github.com
b@y.com,beta,
";

struct StubTracker;

impl TicketTracker for StubTracker {
    fn lookup_type(&self, key: &str) -> Result<String, TrackerError> {
        match key.split('-').next() {
            Some("BUG") => Ok("Bug".to_string()),
            Some("FEAT") => Ok("Story".to_string()),
            _ => Err(TrackerError::NotFound {
                key: key.to_string(),
                status: 404,
            }),
        }
    }
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    build_repo(dir.path());

    let registry = roster::parse_registry(ROSTER);
    assert_eq!(2, registry.team_count());

    let history = GitHistory::open(dir.path()).unwrap();
    let commits = history.commits_since(None, None).unwrap();
    assert_eq!(5, commits.len());
    assert!(commits.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let events = matching_events(&commits, ".rs");
    assert_eq!(4, events.len());

    let mut aggregator = AttributionAggregator::new(&registry);
    for event in &events {
        aggregator.record(&event.file, &event.author_email);
    }

    // author totals conserve the record calls
    let by_author = aggregator.table().totals_by_author("f1.rs");
    assert_eq!(4u64, by_author.values().sum::<u64>());

    // alias collapses into one developer
    let totals = aggregator.totals_by_developer();
    assert_eq!("alice", totals[0].name);
    assert_eq!(3, totals[0].changes);

    let table = aggregator.into_table();
    let alpha = engine::hotlist(&table, "alpha", 25);
    assert_eq!(1, alpha.len());
    assert_eq!(("f1.rs", 3), (alpha[0].file.as_str(), alpha[0].count));

    let beta = engine::hotlist(&table, "beta", 25);
    assert_eq!(("f1.rs", 1), (beta[0].file.as_str(), beta[0].count));

    // correlation: every event counts, merge and free-text extract nothing,
    // resolvable keys group by type
    let mut events_by_file: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for event in &events {
        events_by_file
            .entry(event.file.clone())
            .or_default()
            .push(event.clone());
    }
    let groups = engine::correlate(&events_by_file, &StubTracker);
    let f1 = &groups.files["f1.rs"];
    assert_eq!(4, f1.count);
    assert_eq!(vec!["BUG-1"], f1.by_type["Bug"]);
    assert_eq!(vec!["FEAT-2"], f1.by_type["Story"]);
}

#[test]
fn test_unresolved_author_excluded_from_team_views() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    commit_file(
        &repo,
        dir.path(),
        "f1.rs",
        "content",
        "stranger@nowhere.com",
        "drive-by change",
        1_700_000_000,
    );

    let registry = roster::parse_registry(ROSTER);
    let history = GitHistory::open(dir.path()).unwrap();
    let commits = history.commits_since(None, None).unwrap();
    let events = matching_events(&commits, ".rs");

    let mut aggregator = AttributionAggregator::new(&registry);
    for event in &events {
        aggregator.record(&event.file, &event.author_email);
    }

    assert_eq!(
        1u64,
        aggregator.table().totals_by_author("f1.rs").values().sum::<u64>()
    );
    let table = aggregator.into_table();
    assert!(engine::hotlist(&table, "alpha", 25).is_empty());
    assert!(engine::hotlist(&table, "beta", 25).is_empty());
}
