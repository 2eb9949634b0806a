//! Diagnostics collector
//!
//! Recoverable data-quality problems found while processing reports. The
//! collector is returned alongside results so callers (and tests) can inspect
//! warnings; each entry is also emitted as a `tracing` event.

use crate::error::DuplicateKey;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// Identity key seen twice in one report; the first occurrence was kept
    DuplicateKey,
    /// Score outside of [0, 1]
    ScoreOutOfRange,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticCode::DuplicateKey => write!(f, "duplicate_key"),
            DiagnosticCode::ScoreOutOfRange => write!(f, "score_out_of_range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: DiagnosticCode,
    /// Identity key of the offending entity (ex: "eslint/no-any")
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            code,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn info(code: DiagnosticCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            code,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Warning for a duplicate key found in the `side` ("before"/"after") report
    pub fn duplicate_key(duplicate: &DuplicateKey, side: &str) -> Self {
        Self::warning(
            DiagnosticCode::DuplicateKey,
            duplicate.key.clone(),
            format!("{} in {} report, keeping first occurrence", duplicate, side),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.subject, self.message)
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            DiagnosticLevel::Warning => tracing::warn!(
                code = %diagnostic.code,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
            DiagnosticLevel::Info => tracing::info!(
                code = %diagnostic.code,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
        }
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.level == DiagnosticLevel::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Entries with the given code
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|d| d.code == code).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;

    #[test]
    fn test_duplicate_key_diagnostic() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::duplicate_key(
            &DuplicateKey {
                kind: EntityKind::Audit,
                key: "eslint/no-any".to_string(),
            },
            "before",
        ));

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.has_warnings());
        let entry = &diagnostics.entries()[0];
        assert_eq!(entry.subject, "eslint/no-any");
        assert_eq!(
            entry.message,
            "duplicate audit `eslint/no-any` in before report, keeping first occurrence"
        );
    }

    #[test]
    fn test_info_is_not_a_warning() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::info(DiagnosticCode::ScoreOutOfRange, "x", "noted"));

        assert!(!diagnostics.has_warnings());
        assert_eq!(diagnostics.with_code(DiagnosticCode::ScoreOutOfRange).len(), 1);
    }

    #[test]
    fn test_to_json() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warning(DiagnosticCode::ScoreOutOfRange, "lint/a", "score 1.5"));

        let json = diagnostics.to_json().unwrap();
        assert!(json.contains("\"score_out_of_range\""));
        assert!(json.contains("\"warning\""));
    }
}
