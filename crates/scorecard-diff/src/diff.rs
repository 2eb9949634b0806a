//! Diff types
//!
//! Every tracked kind is partitioned into `changed`, `unchanged`, `added`
//! and `removed`. Added, removed and unchanged entries carry a snapshot of
//! the entity; changed entries carry before/after deltas.

use scorecard_core::Commit;
use serde::{Deserialize, Serialize};

/// Result of comparing two scored reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsDiff {
    /// Provenance of both sides, present when both reports carry a commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<CommitPair>,
    /// Package name of the `after` report
    pub package_name: String,
    /// Version of the `after` report
    pub version: String,
    pub categories: Partition<CategoryResult, CategoryChange>,
    pub groups: Partition<GroupResult, GroupChange>,
    pub audits: Partition<AuditResult, AuditChange>,
}

impl ReportsDiff {
    /// True when anything was added, removed or changed
    pub fn has_changes(&self) -> bool {
        !(self.categories.is_unchanged() && self.groups.is_unchanged() && self.audits.is_unchanged())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPair {
    pub before: Commit,
    pub after: Commit,
}

/// Entities of one kind split by how they moved between reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition<R, C> {
    pub changed: Vec<C>,
    pub unchanged: Vec<R>,
    pub added: Vec<R>,
    pub removed: Vec<R>,
}

impl<R, C> Partition<R, C> {
    pub fn new() -> Self {
        Self {
            changed: Vec::new(),
            unchanged: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Entities seen on either side
    pub fn total(&self) -> usize {
        self.changed.len() + self.unchanged.len() + self.added.len() + self.removed.len()
    }

    /// Nothing added, removed or changed
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }
}

impl<R, C> Default for Partition<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric before/after pair with `diff = after - before`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericDelta {
    pub before: f64,
    pub after: f64,
    pub diff: f64,
}

impl NumericDelta {
    pub fn new(before: f64, after: f64) -> Self {
        Self {
            before,
            after,
            diff: after - before,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayValueDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Owning plugin of a group or audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMeta {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub slug: String,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub slug: String,
    pub title: String,
    pub scores: NumericDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    pub plugin: PluginMeta,
    pub slug: String,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupChange {
    pub plugin: PluginMeta,
    pub slug: String,
    pub title: String,
    pub scores: NumericDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub plugin: PluginMeta,
    pub slug: String,
    pub title: String,
    pub score: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditChange {
    pub plugin: PluginMeta,
    pub slug: String,
    pub title: String,
    pub scores: NumericDelta,
    pub values: NumericDelta,
    /// Present only when the display value differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_values: Option<DisplayValueDelta>,
}

/// A changed entry with a score delta
pub trait ScoreChange {
    fn scores(&self) -> &NumericDelta;
}

impl ScoreChange for CategoryChange {
    fn scores(&self) -> &NumericDelta {
        &self.scores
    }
}

impl ScoreChange for GroupChange {
    fn scores(&self) -> &NumericDelta {
        &self.scores
    }
}

impl ScoreChange for AuditChange {
    fn scores(&self) -> &NumericDelta {
        &self.scores
    }
}
