//! Scorecard Diff: before/after comparison of scored reports
//!
//! Aligns two [`ScoredReport`]s by identity and partitions categories, groups
//! and audits into `added`, `removed`, `changed` and `unchanged`.
//!
//! # Example
//!
//! ```ignore
//! use scorecard_diff::diff_reports;
//!
//! let outcome = diff_reports(&before, &after);
//! for change in &outcome.diff.categories.changed {
//!     println!("{}: {:+.2}", change.title, change.scores.diff);
//! }
//! for warning in outcome.diagnostics.warnings() {
//!     eprintln!("{}", warning);
//! }
//! ```
//!
//! [`ScoredReport`]: scorecard_core::ScoredReport

pub mod diff;
pub mod differ;
pub mod summary;

pub use diff::{
    AuditChange, AuditResult, CategoryChange, CategoryResult, CommitPair, DisplayValueDelta,
    GroupChange, GroupResult, NumericDelta, Partition, PluginMeta, ReportsDiff, ScoreChange,
};
pub use differ::{diff_reports, diff_reports_into, DiffOutcome};
pub use summary::{DiffSummary, KindSummary};
