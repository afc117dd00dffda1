//! Commit walking using libgit2

use crate::models::ChangeEvent;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use git2::{Repository, Sort};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Line deltas for one file in one commit.
#[derive(Debug, Clone)]
pub struct FileDelta {
    pub path: String,
    pub insertions: usize,
    pub deletions: usize,
}

/// Information about a git commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Full commit hash
    pub hash: String,
    /// Author email, lowercased
    pub author_email: String,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
    /// Commit message (first line)
    pub summary: String,
    /// Files changed in this commit, with line stats
    pub files: Vec<FileDelta>,
}

/// Git history reader over one repository.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open a git repository at `path` or any subdirectory of it.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Check if a path is inside a git repository.
    pub fn is_git_repo(path: &Path) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Get the repository root path.
    pub fn repo_root(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")
    }

    /// Walk commits ascending by commit time.
    ///
    /// # Arguments
    /// * `rev` - Branch, tag, or commit to walk from (HEAD if `None`)
    /// * `since` - Drop commits older than this timestamp
    pub fn commits_since(
        &self,
        rev: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
        match rev {
            Some(rev) => {
                let object = self
                    .repo
                    .revparse_single(rev)
                    .with_context(|| format!("Unknown rev: {}", rev))?;
                let commit = object
                    .peel_to_commit()
                    .with_context(|| format!("Rev {} does not point at a commit", rev))?;
                revwalk.push(commit.id())?;
            }
            None => revwalk.push_head().context("Repository has no HEAD")?,
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let timestamp = git_time_to_utc(&commit.time());
            if since.is_some_and(|cutoff| timestamp < cutoff) {
                continue;
            }

            commits.push(self.extract_commit_info(&commit, timestamp)?);
        }

        Ok(commits)
    }

    /// Every distinct author email in the walked range, lowercased.
    pub fn author_emails(
        &self,
        rev: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<BTreeSet<String>> {
        Ok(self
            .commits_since(rev, since)?
            .into_iter()
            .map(|c| c.author_email)
            .filter(|e| !e.is_empty())
            .collect())
    }

    /// Extract commit info plus per-file line deltas against the first
    /// parent.
    fn extract_commit_info(
        &self,
        commit: &git2::Commit,
        timestamp: DateTime<Utc>,
    ) -> Result<CommitInfo> {
        let summary = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();
        let author_email = commit
            .author()
            .email()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        let parent = commit.parent(0).ok();
        let tree = commit.tree()?;
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        // Both diff callbacks need the same map, hence the RefCell
        let per_file: RefCell<BTreeMap<String, (usize, usize)>> = RefCell::new(BTreeMap::new());
        diff.foreach(
            &mut |delta, _| {
                if let Some(path) = delta.new_file().path() {
                    per_file
                        .borrow_mut()
                        .entry(path.to_string_lossy().to_string())
                        .or_default();
                }
                true
            },
            None,
            None,
            Some(&mut |delta, _hunk, line| {
                if let Some(path) = delta.new_file().path() {
                    let mut per_file = per_file.borrow_mut();
                    let entry = per_file.entry(path.to_string_lossy().to_string()).or_default();
                    match line.origin() {
                        '+' => entry.0 += 1,
                        '-' => entry.1 += 1,
                        _ => {}
                    }
                }
                true
            }),
        )?;

        let files = per_file
            .into_inner()
            .into_iter()
            .map(|(path, (insertions, deletions))| FileDelta {
                path,
                insertions,
                deletions,
            })
            .collect();

        Ok(CommitInfo {
            hash: commit.id().to_string(),
            author_email,
            timestamp,
            summary,
            files,
        })
    }
}

/// Expand commits into change events, one per touched file whose path
/// contains `pattern`. Commit order is preserved.
pub fn matching_events(commits: &[CommitInfo], pattern: &str) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    for commit in commits {
        for file in &commit.files {
            if !file.path.contains(pattern) {
                continue;
            }
            events.push(ChangeEvent {
                file: file.path.clone(),
                author_email: commit.author_email.clone(),
                summary: commit.summary.clone(),
                commit: commit.hash.clone(),
                timestamp: commit.timestamp,
                insertions: file.insertions,
                deletions: file.deletions,
            });
        }
    }
    events
}

fn git_time_to_utc(time: &git2::Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().unwrap_or_default())
}
