//! Unified Error Model
//!
//! Every message names the offending plugin/category/group/audit slug.
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("REF/{0}")]
    Reference(#[from] ReferenceError),

    #[error("CFG/{0}")]
    Configuration(#[from] ConfigurationError),

    #[error("INV/{0}")]
    InvariantViolation(#[from] DuplicateKey),
}

/// A ref names a plugin, audit or group that does not exist
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("plugin `{plugin}` referenced by {referenced_by} does not exist")]
    MissingPlugin { plugin: String, referenced_by: EntityRef },

    #[error("audit `{plugin}/{audit}` referenced by {referenced_by} does not exist")]
    MissingAudit {
        plugin: String,
        audit: String,
        referenced_by: EntityRef,
    },

    #[error("group `{plugin}/{group}` referenced by {referenced_by} does not exist")]
    MissingGroup {
        plugin: String,
        group: String,
        referenced_by: EntityRef,
    },
}

/// Weighting configuration that cannot yield a score
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{owner} has refs but their total weight is 0")]
    ZeroTotalWeight { owner: EntityRef },

    #[error("{owner} has no refs")]
    EmptyRefs { owner: EntityRef },

    #[error("{owner} has an invalid ref weight {weight}")]
    InvalidWeight { owner: EntityRef, weight: f64 },
}

/// Identity key seen twice where uniqueness was assumed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate {kind} `{key}`")]
pub struct DuplicateKey {
    pub kind: EntityKind,
    pub key: String,
}

/// The entity that owns a list of refs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Category { slug: String },
    Group { plugin: String, slug: String },
}

impl EntityRef {
    pub fn category(slug: impl Into<String>) -> Self {
        EntityRef::Category { slug: slug.into() }
    }

    pub fn group(plugin: impl Into<String>, slug: impl Into<String>) -> Self {
        EntityRef::Group {
            plugin: plugin.into(),
            slug: slug.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityRef::Category { slug } => write!(f, "category `{}`", slug),
            EntityRef::Group { plugin, slug } => write!(f, "group `{}/{}`", plugin, slug),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Plugin,
    Audit,
    Group,
    Category,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Plugin => write!(f, "plugin"),
            EntityKind::Audit => write!(f, "audit"),
            EntityKind::Group => write!(f, "group"),
            EntityKind::Category => write!(f, "category"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_names_both_slugs() {
        let err: ScoringError = ReferenceError::MissingAudit {
            plugin: "eslint".to_string(),
            audit: "no-any".to_string(),
            referenced_by: EntityRef::category("code-style"),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "REF/audit `eslint/no-any` referenced by category `code-style` does not exist"
        );
    }

    #[test]
    fn test_configuration_error_names_owner() {
        let err: ScoringError = ConfigurationError::ZeroTotalWeight {
            owner: EntityRef::group("eslint", "suggestions"),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "CFG/group `eslint/suggestions` has refs but their total weight is 0"
        );
    }

    #[test]
    fn test_duplicate_key_display() {
        let err: ScoringError = DuplicateKey {
            kind: EntityKind::Audit,
            key: "eslint/no-any".to_string(),
        }
        .into();

        assert_eq!(err.to_string(), "INV/duplicate audit `eslint/no-any`");
    }
}
