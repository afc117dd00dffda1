//! Identity resolution: emails to developers, developers to teams
//!
//! A developer is a display name plus a set of email aliases. Aliases are
//! case-insensitive and unique across the registry: an email belongs to at
//! most one developer, and a developer belongs to at most one team at any
//! time. Reassignment moves the developer in a single index update and never
//! rewrites previously accumulated counts.
//!
//! Lookups go through a normalized-email index rather than a scan over team
//! member lists, so registering the same logical developer twice with an
//! overlapping alias set merges into one entity instead of silently creating
//! a duplicate. Two rows with fully disjoint alias sets still produce two
//! developers that can never be reconciled; that is accepted behavior, not
//! something the registry detects.

pub mod roster;

use std::collections::{BTreeSet, HashMap};

/// Derive a friendly display name from an email address.
///
/// Takes everything before the `@`, dropping an optional `local+`
/// disambiguation prefix up to and including the last `+` (compensates for
/// autogenerated noreply addresses like `123456+alice@users.noreply.github.com`).
/// Falls back to the whole string when there is no `@`; never fails.
pub fn derive_name(email: &str) -> String {
    let local = match email.find('@') {
        Some(at) => &email[..at],
        None => email,
    };
    match local.rfind('+') {
        Some(plus) => local[plus + 1..].to_string(),
        None => local.to_string(),
    }
}

/// A logical developer: one display name, many email aliases.
#[derive(Debug, Clone)]
pub struct Developer {
    name: String,
    aliases: BTreeSet<String>,
}

impl Developer {
    /// Build a developer from one or more emails. The display name is
    /// derived from the first email and is stable for the lifetime of the
    /// developer; aliases are normalized to lowercase.
    pub fn new<I, S>(emails: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut iter = emails.into_iter();
        let first = iter.next()?;
        let first = first.as_ref().trim().to_lowercase();
        if first.is_empty() {
            return None;
        }
        let mut aliases = BTreeSet::new();
        aliases.insert(first.clone());
        for email in iter {
            let email = email.as_ref().trim().to_lowercase();
            if !email.is_empty() {
                aliases.insert(email);
            }
        }
        Some(Self {
            name: derive_name(&first),
            aliases,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased alias set, in lexical order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn matches_email(&self, email: &str) -> bool {
        self.aliases.contains(&email.trim().to_lowercase())
    }
}

/// Internal developer handle, index into the registry's developer table.
type DeveloperId = usize;

/// Owns developers, the alias index, and current team membership.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    developers: Vec<Developer>,
    /// Normalized email -> developer. Authoritative alias index.
    email_index: HashMap<String, DeveloperId>,
    /// Developer -> current team. Authoritative membership index; per-team
    /// member sets are derived from this, never stored a second time.
    team_of: Vec<String>,
    /// Team names in first-assignment order. A team persists once created,
    /// even when reassignments empty it.
    team_names: Vec<String>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a developer to a team, creating the team if absent.
    ///
    /// If any alias of `developer` is already registered, the existing
    /// developer absorbs the new aliases and moves to `team`; matching is by
    /// alias overlap, not object identity. Otherwise the developer is added
    /// fresh. Either way the developer ends up with exactly one membership.
    pub fn assign_team(&mut self, developer: Developer, team: &str) {
        if !self.team_names.iter().any(|t| t == team) {
            self.team_names.push(team.to_string());
        }

        let existing = developer
            .aliases
            .iter()
            .find_map(|email| self.email_index.get(email).copied());

        let id = match existing {
            Some(id) => {
                self.team_of[id] = team.to_string();
                for email in &developer.aliases {
                    self.developers[id].aliases.insert(email.clone());
                }
                id
            }
            None => {
                let id = self.developers.len();
                self.developers.push(developer);
                self.team_of.push(team.to_string());
                id
            }
        };

        for email in self.developers[id].aliases.clone() {
            self.email_index.insert(email, id);
        }
    }

    /// Resolve an email to its developer and current team.
    ///
    /// Case-insensitive exact match over the alias index; `None` on a miss,
    /// never an error. Idempotent for unchanged registry state.
    pub fn find_by_email(&self, email: &str) -> Option<(&Developer, &str)> {
        let id = *self.email_index.get(&email.trim().to_lowercase())?;
        Some((&self.developers[id], self.team_of[id].as_str()))
    }

    /// Team names in first-assignment order.
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.team_names.iter().map(String::as_str)
    }

    /// Current members of a team, derived from the membership index.
    pub fn members(&self, team: &str) -> Vec<&Developer> {
        self.team_of
            .iter()
            .enumerate()
            .filter(|(_, t)| t.as_str() == team)
            .map(|(id, _)| &self.developers[id])
            .collect()
    }

    pub fn team_size(&self, team: &str) -> usize {
        self.team_of.iter().filter(|t| t.as_str() == team).count()
    }

    pub fn team_count(&self) -> usize {
        self.team_names.len()
    }

    pub fn developer_count(&self) -> usize {
        self.developers.len()
    }
}
