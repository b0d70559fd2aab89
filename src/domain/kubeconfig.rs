//! Kubeconfig document model: parse, merge, deduplicate, validate
//!
//! The merge is name-keyed and idempotent: merging a document into
//! itself (or merging the result with any of its inputs) changes
//! nothing. Entries with the same name and an identical body are
//! skipped; same name with a different body is a conflict unless the
//! caller opts into last-one-wins.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};

/// One entry in a kubeconfig list section (`clusters`, `contexts`, `users`).
///
/// The body keeps the payload key (`cluster:`, `context:`, `user:`) and
/// anything else the file carries, so round-tripping is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
    #[serde(flatten)]
    pub body: BTreeMap<String, Value>,
}

/// A kubeconfig document, as produced by `kubectl config view --flatten`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kubeconfig {
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub clusters: Vec<NamedEntry>,

    #[serde(default)]
    pub contexts: Vec<NamedEntry>,

    #[serde(default)]
    pub users: Vec<NamedEntry>,

    #[serde(
        rename = "current-context",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_context: Option<String>,

    /// Unknown top-level fields (e.g. `preferences`), preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_kind() -> String {
    "Config".to_string()
}

impl Default for Kubeconfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            clusters: Vec::new(),
            contexts: Vec::new(),
            users: Vec::new(),
            current_context: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Per-section counters describing what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// New entries added
    pub added: usize,
    /// Name + body already present, skipped
    pub skipped: usize,
    /// Conflicting entries overwritten (only with last-one-wins)
    pub replaced: usize,
}

impl MergeOutcome {
    pub fn absorb(&mut self, other: MergeOutcome) {
        self.added += other.added;
        self.skipped += other.skipped;
        self.replaced += other.replaced;
    }
}

/// Merge `incoming` into `target`, keyed by entry name.
fn merge_section(
    target: &mut Vec<NamedEntry>,
    incoming: &[NamedEntry],
    section: &str,
    force: bool,
) -> DomainResult<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for entry in incoming {
        match target.iter_mut().find(|e| e.name == entry.name) {
            None => {
                target.push(entry.clone());
                outcome.added += 1;
            }
            Some(existing) if existing.body == entry.body => {
                outcome.skipped += 1;
            }
            Some(existing) => {
                if !force {
                    return Err(DomainError::ConflictingEntry {
                        section: section.to_string(),
                        name: entry.name.clone(),
                    });
                }
                existing.body = entry.body.clone();
                outcome.replaced += 1;
            }
        }
    }

    Ok(outcome)
}

impl Kubeconfig {
    /// Merge another document into this one.
    ///
    /// With `force`, a same-name entry with a different body is
    /// overwritten (last one wins); without it, the conflict is an error
    /// and `self` is left partially merged — callers should discard it.
    /// `current-context` is kept from the first document that set one.
    pub fn merge_from(&mut self, other: &Kubeconfig, force: bool) -> DomainResult<MergeOutcome> {
        let mut outcome = MergeOutcome::default();
        outcome.absorb(merge_section(
            &mut self.clusters,
            &other.clusters,
            "clusters",
            force,
        )?);
        outcome.absorb(merge_section(
            &mut self.contexts,
            &other.contexts,
            "contexts",
            force,
        )?);
        outcome.absorb(merge_section(&mut self.users, &other.users, "users", force)?);

        if self.current_context.is_none() {
            self.current_context = other.current_context.clone();
        }

        debug!(
            "merge_from: added={}, skipped={}, replaced={}",
            outcome.added, outcome.skipped, outcome.replaced
        );
        Ok(outcome)
    }

    /// Structural validation.
    ///
    /// Checks that names are well-formed and unique per section, that
    /// every context references a defined cluster and user, and that
    /// `current-context` (if set) names a defined context.
    pub fn validate(&self) -> DomainResult<()> {
        validate_section(&self.clusters, "clusters")?;
        validate_section(&self.contexts, "contexts")?;
        validate_section(&self.users, "users")?;

        let cluster_names: HashSet<&str> =
            self.clusters.iter().map(|e| e.name.as_str()).collect();
        let user_names: HashSet<&str> = self.users.iter().map(|e| e.name.as_str()).collect();

        for ctx in &self.contexts {
            let Some(body) = ctx.body.get("context") else {
                return Err(DomainError::InvalidName {
                    section: "contexts".to_string(),
                    name: format!("{} (missing 'context' body)", ctx.name),
                });
            };

            let cluster = body.get("cluster").and_then(Value::as_str).unwrap_or("");
            if !cluster_names.contains(cluster) {
                return Err(DomainError::DanglingReference {
                    kind: "context".to_string(),
                    referrer: ctx.name.clone(),
                    section: "clusters".to_string(),
                    name: cluster.to_string(),
                });
            }

            let user = body.get("user").and_then(Value::as_str).unwrap_or("");
            if !user_names.contains(user) {
                return Err(DomainError::DanglingReference {
                    kind: "context".to_string(),
                    referrer: ctx.name.clone(),
                    section: "users".to_string(),
                    name: user.to_string(),
                });
            }
        }

        if let Some(current) = &self.current_context {
            if !self.contexts.iter().any(|c| &c.name == current) {
                return Err(DomainError::DanglingReference {
                    kind: "current-context".to_string(),
                    referrer: current.clone(),
                    section: "contexts".to_string(),
                    name: current.clone(),
                });
            }
        }

        Ok(())
    }
}

fn entry_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // kubeconfig names are free-form but whitespace breaks every
    // downstream `kubectl --context <name>` invocation
    PATTERN.get_or_init(|| Regex::new(r"^\S+$").unwrap())
}

fn validate_section(entries: &[NamedEntry], section: &str) -> DomainResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in entries {
        if !entry_name_pattern().is_match(&entry.name) {
            return Err(DomainError::InvalidName {
                section: section.to_string(),
                name: entry.name.clone(),
            });
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(DomainError::DuplicateName {
                section: section.to_string(),
                name: entry.name.clone(),
            });
        }
    }

    Ok(())
}
