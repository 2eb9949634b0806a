//! Scorecard Core: Report data model, errors and diagnostics
//!
//! Shared types for the scoring, sorting and diff engine. A [`Report`] is the
//! raw output of one collection run; a [`ScoredReport`] adds computed group
//! and category scores.

pub mod diagnostics;
pub mod error;
pub mod model;
pub mod scored;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticLevel, Diagnostics};
pub use error::{
    ConfigurationError, DuplicateKey, EntityKind, EntityRef, ReferenceError, ScoringError,
};
pub use model::{
    Audit, AuditDetails, AuditRef, Category, CategoryRef, Commit, FileSource, Group, Issue,
    IssueSeverity, IssueSource, PluginReport, RefKind, Report, SourcePosition, UrlSource,
};
pub use scored::{IssueCounts, ScoredCategory, ScoredGroup, ScoredPluginReport, ScoredReport};

/// Engine version
pub const ENGINE_VERSION: &str = "1.0.0";
