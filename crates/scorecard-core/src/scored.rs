//! Scored Model: a Report with computed group and category scores
//!
//! Only the scorer builds these values. They serialize to the same shape as
//! the raw report with an extra `score` on every group and category.
use crate::model::{Audit, AuditRef, Category, CategoryRef, Commit, Group, IssueSeverity, PluginReport, Report};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredReport {
    pub package_name: String,
    pub version: String,
    pub date: DateTime<Utc>,
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    pub plugins: Vec<ScoredPluginReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<ScoredCategory>,
}

impl ScoredReport {
    /// Assemble from the source report and the computed parts
    pub fn from_report(
        report: &Report,
        plugins: Vec<ScoredPluginReport>,
        categories: Vec<ScoredCategory>,
    ) -> Self {
        Self {
            package_name: report.package_name.clone(),
            version: report.version.clone(),
            date: report.date,
            duration: report.duration,
            commit: report.commit.clone(),
            plugins,
            categories,
        }
    }

    pub fn plugin(&self, slug: &str) -> Option<&ScoredPluginReport> {
        self.plugins.iter().find(|p| p.slug == slug)
    }

    pub fn category(&self, slug: &str) -> Option<&ScoredCategory> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn audit_count(&self) -> usize {
        self.plugins.iter().map(|p| p.audits.len()).sum()
    }

    pub fn group_count(&self) -> usize {
        self.plugins.iter().map(|p| p.groups.len()).sum()
    }

    /// Issue totals per severity across every audit
    pub fn issue_counts(&self) -> IssueCounts {
        let mut counts = IssueCounts::default();
        for issue in self.plugins.iter().flat_map(|p| &p.audits).flat_map(|a| a.issues()) {
            match issue.severity {
                IssueSeverity::Error => counts.errors += 1,
                IssueSeverity::Warning => counts.warnings += 1,
                IssueSeverity::Info => counts.infos += 1,
            }
        }
        counts
    }

    /// `blake3:<hex>` digest of the JSON encoding.
    ///
    /// Two reports with the same fingerprint serialize to identical bytes.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(format!("blake3:{}", blake3::hash(&bytes)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPluginReport {
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
    pub groups: Vec<ScoredGroup>,
}

impl ScoredPluginReport {
    pub fn from_plugin(plugin: &PluginReport, groups: Vec<ScoredGroup>) -> Self {
        Self {
            slug: plugin.slug.clone(),
            title: plugin.title.clone(),
            icon: plugin.icon.clone(),
            description: plugin.description.clone(),
            docs_url: plugin.docs_url.clone(),
            audits: plugin.audits.clone(),
            groups,
        }
    }

    pub fn audit(&self, slug: &str) -> Option<&Audit> {
        self.audits.iter().find(|a| a.slug == slug)
    }

    pub fn group(&self, slug: &str) -> Option<&ScoredGroup> {
        self.groups.iter().find(|g| g.slug == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGroup {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub refs: Vec<AuditRef>,
    pub score: f64,
}

impl ScoredGroup {
    pub fn from_group(group: &Group, score: f64) -> Self {
        Self {
            slug: group.slug.clone(),
            title: group.title.clone(),
            description: group.description.clone(),
            refs: group.refs.clone(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCategory {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_binary: bool,
    pub refs: Vec<CategoryRef>,
    pub score: f64,
}

impl ScoredCategory {
    pub fn from_category(category: &Category, score: f64) -> Self {
        Self {
            slug: category.slug.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            is_binary: category.is_binary,
            refs: category.refs.clone(),
            score,
        }
    }
}

/// Issue totals per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl IssueCounts {
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Issue;

    fn scored() -> ScoredReport {
        let date = "2026-03-01T12:00:00Z".parse().unwrap();
        let report = Report::new("pkg", "0.1.0", date);
        let plugin = PluginReport::new("lint", "Lint")
            .with_audit(Audit::new("a", "A", 0.5, 2.0).with_issues(vec![
                Issue::error("e1"),
                Issue::warning("w1"),
                Issue::warning("w2"),
            ]))
            .with_audit(Audit::new("b", "B", 1.0, 0.0).with_issues(vec![Issue::info("i1")]));
        let group = Group::new("g", "G", vec![AuditRef::new("a", 1.0)]);
        ScoredReport::from_report(
            &report,
            vec![ScoredPluginReport::from_plugin(&plugin, vec![ScoredGroup::from_group(&group, 0.5)])],
            vec![],
        )
    }

    #[test]
    fn test_counts() {
        let report = scored();
        assert_eq!(report.audit_count(), 2);
        assert_eq!(report.group_count(), 1);
        assert_eq!(
            report.issue_counts(),
            IssueCounts { errors: 1, warnings: 2, infos: 1 }
        );
        assert_eq!(report.issue_counts().total(), 4);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = scored().fingerprint().unwrap();
        let b = scored().fingerprint().unwrap();
        assert!(a.starts_with("blake3:"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_scores() {
        let mut changed = scored();
        changed.plugins[0].groups[0].score = 0.25;
        assert_ne!(scored().fingerprint().unwrap(), changed.fingerprint().unwrap());
    }
}
