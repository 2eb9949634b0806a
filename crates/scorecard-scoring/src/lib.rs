//! Scorecard Scoring: weighted scores and canonical ordering
//!
//! Turns a raw [`Report`] into a [`ScoredReport`] and puts every member list
//! of a scored report into one canonical order.
//!
//! ```text
//! Report ──► ReportIndex ──► Scorer ──► ScoredReport ──► Sorter ──► sorted ScoredReport
//!              (resolver)    (groups, then categories)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use scorecard_scoring::{score_report, sort_report};
//!
//! let scored = score_report(&report)?;
//! let sorted = sort_report(&scored)?;
//! for category in &sorted.categories {
//!     println!("{}: {:.2}", category.title, category.score);
//! }
//! ```

pub mod profile;
pub mod resolver;
pub mod scorer;
pub mod sorter;

pub use profile::{BinaryCategoryRule, EngineProfile, ProfileError};
pub use resolver::{resolve_ref, GroupScores, PluginIndex, ReportIndex};
pub use scorer::{category_score, group_score, score_report, weighted_average, Scorer};
pub use sorter::{
    category_entries, compare_audits, compare_category_entries, compare_groups, compare_issues,
    sort_audit_issues, sort_plugin, sort_report, sorted_category_entries, CategoryEntry,
};

use scorecard_core::{Report, ScoredReport, ScoringError};

/// Score a report and sort the result with the default profile
pub fn score_and_sort(report: &Report) -> Result<ScoredReport, ScoringError> {
    Scorer::default().evaluate(report)
}

/// Score a report under a named profile mode
pub fn evaluate(report: &Report, mode: &str) -> Result<ScoredReport, ScoringError> {
    Scorer::for_mode(mode).evaluate(report)
}
