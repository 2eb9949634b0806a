//! Data Model: Report, PluginReport, Audit, Group, Category
//!
//! Raw collection output as produced by the plugin runners. Values of these
//! types are immutable inputs to the engine; every derivation returns a new
//! structure.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output of one collection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Package that produced the report (ex: "@acme/cli")
    pub package_name: String,
    /// Version of that package
    pub version: String,
    /// Start of the collection run
    pub date: DateTime<Utc>,
    /// Run duration in milliseconds
    pub duration: u64,
    /// Commit the run was collected on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    pub plugins: Vec<PluginReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
}

impl Report {
    pub fn new(package_name: impl Into<String>, version: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            package_name: package_name.into(),
            version: version.into(),
            date,
            duration: 0,
            commit: None,
            plugins: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = duration_ms;
        self
    }

    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn with_plugin(mut self, plugin: PluginReport) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_plugins(mut self, plugins: impl IntoIterator<Item = PluginReport>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn plugin(&self, slug: &str) -> Option<&PluginReport> {
        self.plugins.iter().find(|p| p.slug == slug)
    }
}

/// Git provenance of a report; passed through to diffs untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginReport {
    /// Unique across the report
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    pub audits: Vec<Audit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
}

impl PluginReport {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            icon: None,
            description: None,
            docs_url: None,
            audits: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_audit(mut self, audit: Audit) -> Self {
        self.audits.push(audit);
        self
    }

    pub fn with_audits(mut self, audits: impl IntoIterator<Item = Audit>) -> Self {
        self.audits.extend(audits);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.groups.extend(groups);
        self
    }
}

/// A single measured check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    /// Unique within its plugin
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    /// Normalized score (0.0 to 1.0)
    pub score: f64,
    /// Raw measured value
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

impl Audit {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, score: f64, value: f64) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            docs_url: None,
            score,
            value,
            display_value: None,
            details: None,
        }
    }

    pub fn with_display_value(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = Some(display_value.into());
        self
    }

    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = Some(docs_url.into());
        self
    }

    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.details = Some(AuditDetails { issues });
        self
    }

    /// Issues attached to the audit, empty when there are no details
    pub fn issues(&self) -> &[Issue] {
        self.details.as_ref().map(|d| d.issues.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditDetails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    pub severity: IssueSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<IssueSource>,
}

impl Issue {
    pub fn new(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            source: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(IssueSeverity::Info, message)
    }

    /// Attach a file source starting at `start_line`
    pub fn at(mut self, file: impl Into<String>, start_line: u32) -> Self {
        self.source = Some(IssueSource::File(FileSource {
            file: file.into(),
            position: Some(SourcePosition::line(start_line)),
        }));
        self
    }

    pub fn with_source(mut self, source: IssueSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// Issue severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IssueSeverity::Info => write!(f, "info"),
            IssueSeverity::Warning => write!(f, "warning"),
            IssueSeverity::Error => write!(f, "error"),
        }
    }
}

/// Where an issue was found: a file position or a URL plus selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueSource {
    File(FileSource),
    Url(UrlSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub start_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl SourcePosition {
    pub fn line(start_line: u32) -> Self {
        Self {
            start_line,
            start_column: None,
            end_line: None,
            end_column: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// Weighted bundle of audits within one plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Audits of the same plugin; groups never reference groups
    pub refs: Vec<AuditRef>,
}

impl Group {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, refs: Vec<AuditRef>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            refs,
        }
    }
}

/// Weighted pointer from a group to an audit of the same plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRef {
    pub slug: String,
    pub weight: f64,
}

impl AuditRef {
    pub fn new(slug: impl Into<String>, weight: f64) -> Self {
        Self {
            slug: slug.into(),
            weight,
        }
    }
}

/// Cross-plugin weighted rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique across the report
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Presentation hint unless the engine profile opts into all-or-nothing scoring
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_binary: bool,
    pub refs: Vec<CategoryRef>,
}

impl Category {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, refs: Vec<CategoryRef>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            is_binary: false,
            refs,
        }
    }

    pub fn binary(mut self) -> Self {
        self.is_binary = true;
        self
    }
}

/// Weighted pointer from a category to an audit or a group.
///
/// Closed union: a category can reach an audit directly or through exactly
/// one group, so the reference graph has no cycles by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CategoryRef {
    Audit { plugin: String, slug: String, weight: f64 },
    Group { plugin: String, slug: String, weight: f64 },
}

impl CategoryRef {
    pub fn audit(plugin: impl Into<String>, slug: impl Into<String>, weight: f64) -> Self {
        CategoryRef::Audit {
            plugin: plugin.into(),
            slug: slug.into(),
            weight,
        }
    }

    pub fn group(plugin: impl Into<String>, slug: impl Into<String>, weight: f64) -> Self {
        CategoryRef::Group {
            plugin: plugin.into(),
            slug: slug.into(),
            weight,
        }
    }

    pub fn plugin(&self) -> &str {
        match self {
            CategoryRef::Audit { plugin, .. } | CategoryRef::Group { plugin, .. } => plugin,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            CategoryRef::Audit { slug, .. } | CategoryRef::Group { slug, .. } => slug,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            CategoryRef::Audit { weight, .. } | CategoryRef::Group { weight, .. } => *weight,
        }
    }

    pub fn kind(&self) -> RefKind {
        match self {
            CategoryRef::Audit { .. } => RefKind::Audit,
            CategoryRef::Group { .. } => RefKind::Group,
        }
    }
}

/// Target kind of a category ref; audits order before groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Audit,
    Group,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RefKind::Audit => write!(f, "audit"),
            RefKind::Group => write!(f, "group"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_ref_tagged_by_type() {
        let r: CategoryRef = serde_json::from_value(json!({
            "type": "group",
            "plugin": "eslint",
            "slug": "recommended",
            "weight": 2
        }))
        .unwrap();

        assert_eq!(r, CategoryRef::group("eslint", "recommended", 2.0));
        assert_eq!(r.kind(), RefKind::Group);
        assert_eq!(r.plugin(), "eslint");
    }

    #[test]
    fn test_issue_source_variants() {
        let file: IssueSource = serde_json::from_value(json!({
            "file": "src/index.ts",
            "position": { "startLine": 4, "endLine": 6 }
        }))
        .unwrap();
        let url: IssueSource = serde_json::from_value(json!({
            "url": "https://example.com",
            "selector": "#main"
        }))
        .unwrap();

        assert!(matches!(file, IssueSource::File(FileSource { position: Some(p), .. }) if p.end_line == Some(6)));
        assert!(matches!(url, IssueSource::Url(UrlSource { selector: Some(_), .. })));
    }

    #[test]
    fn test_report_json_uses_camel_case() {
        let date = "2026-01-01T00:00:00Z".parse().unwrap();
        let report = Report::new("@acme/cli", "1.2.0", date).with_plugin(
            PluginReport::new("eslint", "ESLint")
                .with_audit(Audit::new("no-any", "No any", 1.0, 0.0).with_display_value("0 errors")),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["packageName"], "@acme/cli");
        assert_eq!(value["plugins"][0]["audits"][0]["displayValue"], "0 errors");
        assert!(value.get("categories").is_none());
    }

    #[test]
    fn test_severity_rank() {
        assert!(IssueSeverity::Error > IssueSeverity::Warning);
        assert!(IssueSeverity::Warning > IssueSeverity::Info);
    }

    #[test]
    fn test_audit_issues_default_empty() {
        let audit = Audit::new("a", "A", 0.5, 3.0);
        assert!(audit.issues().is_empty());

        let audit = audit.with_issues(vec![Issue::error("boom").at("src/a.ts", 3)]);
        assert_eq!(audit.issues().len(), 1);
    }
}
