//! Canonical ordering of scored reports
//!
//! Every comparator ends on identity keys, so any two distinct entries
//! compare unequal and sorting is deterministic and idempotent. Floats
//! compare with `total_cmp`; strings compare by bytes.
//!
//! Plugin and category lists keep their declared order; the lists inside
//! them (category refs, plugin audits and groups, audit issues) are sorted.

use scorecard_core::{
    Audit, AuditDetails, CategoryRef, EntityRef, Issue, IssueSource, RefKind, ReferenceError,
    ScoredCategory, ScoredGroup, ScoredPluginReport, ScoredReport, ScoringError, SourcePosition,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A category ref resolved for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    #[serde(rename = "type")]
    pub kind: RefKind,
    pub plugin: String,
    pub slug: String,
    pub title: String,
    pub weight: f64,
    pub score: f64,
    /// Raw value, audits only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Audits: worst score first, then larger value, then title
pub fn compare_audits(a: &Audit, b: &Audit) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| b.value.total_cmp(&a.value))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.slug.cmp(&b.slug))
}

/// Groups: worst score first, then title
pub fn compare_groups(a: &ScoredGroup, b: &ScoredGroup) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.slug.cmp(&b.slug))
}

/// Category entries: heaviest first, then worst score, then larger value,
/// then title
pub fn compare_category_entries(a: &CategoryEntry, b: &CategoryEntry) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.score.total_cmp(&b.score))
        .then_with(|| compare_values_desc(a.value, b.value))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.plugin.cmp(&b.plugin))
        .then_with(|| a.slug.cmp(&b.slug))
        .then_with(|| a.kind.cmp(&b.kind))
}

// Entries with a value sort before entries without one.
fn compare_values_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Issues: most severe first, then source location, then message.
///
/// Issues without a source come before located ones; file sources come
/// before URL sources.
pub fn compare_issues(a: &Issue, b: &Issue) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| compare_sources(a.source.as_ref(), b.source.as_ref()))
        .then_with(|| a.message.cmp(&b.message))
}

fn compare_sources(a: Option<&IssueSource>, b: Option<&IssueSource>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(IssueSource::File(a)), Some(IssueSource::File(b))) => a
            .file
            .cmp(&b.file)
            .then_with(|| compare_positions(a.position.as_ref(), b.position.as_ref())),
        (Some(IssueSource::File(_)), Some(IssueSource::Url(_))) => Ordering::Less,
        (Some(IssueSource::Url(_)), Some(IssueSource::File(_))) => Ordering::Greater,
        (Some(IssueSource::Url(a)), Some(IssueSource::Url(b))) => a
            .url
            .cmp(&b.url)
            .then_with(|| a.selector.cmp(&b.selector)),
    }
}

fn compare_positions(a: Option<&SourcePosition>, b: Option<&SourcePosition>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .start_line
            .cmp(&b.start_line)
            .then_with(|| a.start_column.cmp(&b.start_column))
            .then_with(|| a.end_line.cmp(&b.end_line))
            .then_with(|| a.end_column.cmp(&b.end_column)),
    }
}

/// Lookup of scored audits and groups by (plugin, slug)
struct ScoredIndex<'a> {
    audits: HashMap<(&'a str, &'a str), &'a Audit>,
    groups: HashMap<(&'a str, &'a str), &'a ScoredGroup>,
}

impl<'a> ScoredIndex<'a> {
    fn build(plugins: &'a [ScoredPluginReport]) -> Self {
        let mut audits = HashMap::new();
        let mut groups = HashMap::new();
        for plugin in plugins {
            for audit in &plugin.audits {
                audits.entry((plugin.slug.as_str(), audit.slug.as_str())).or_insert(audit);
            }
            for group in &plugin.groups {
                groups.entry((plugin.slug.as_str(), group.slug.as_str())).or_insert(group);
            }
        }
        Self { audits, groups }
    }

    fn entry(&self, r: &CategoryRef, category: &str) -> Result<CategoryEntry, ReferenceError> {
        let key = (r.plugin(), r.slug());
        match r.kind() {
            RefKind::Audit => {
                let audit = self.audits.get(&key).ok_or_else(|| ReferenceError::MissingAudit {
                    plugin: r.plugin().to_string(),
                    audit: r.slug().to_string(),
                    referenced_by: EntityRef::category(category),
                })?;
                Ok(CategoryEntry {
                    kind: RefKind::Audit,
                    plugin: r.plugin().to_string(),
                    slug: audit.slug.clone(),
                    title: audit.title.clone(),
                    weight: r.weight(),
                    score: audit.score,
                    value: Some(audit.value),
                })
            }
            RefKind::Group => {
                let group = self.groups.get(&key).ok_or_else(|| ReferenceError::MissingGroup {
                    plugin: r.plugin().to_string(),
                    group: r.slug().to_string(),
                    referenced_by: EntityRef::category(category),
                })?;
                Ok(CategoryEntry {
                    kind: RefKind::Group,
                    plugin: r.plugin().to_string(),
                    slug: group.slug.clone(),
                    title: group.title.clone(),
                    weight: r.weight(),
                    score: group.score,
                    value: None,
                })
            }
        }
    }
}

/// Resolve a category's refs into display entries, in declared order
pub fn category_entries(
    category: &ScoredCategory,
    plugins: &[ScoredPluginReport],
) -> Result<Vec<CategoryEntry>, ScoringError> {
    let index = ScoredIndex::build(plugins);
    resolve_entries(category, &index)
}

/// Display entries of a category in canonical order
pub fn sorted_category_entries(
    category: &ScoredCategory,
    plugins: &[ScoredPluginReport],
) -> Result<Vec<CategoryEntry>, ScoringError> {
    let mut entries = category_entries(category, plugins)?;
    entries.sort_by(compare_category_entries);
    Ok(entries)
}

fn resolve_entries(
    category: &ScoredCategory,
    index: &ScoredIndex<'_>,
) -> Result<Vec<CategoryEntry>, ScoringError> {
    category
        .refs
        .iter()
        .map(|r| index.entry(r, &category.slug).map_err(ScoringError::from))
        .collect()
}

/// Sort the issues of an audit, leaving everything else as is
pub fn sort_audit_issues(audit: &Audit) -> Audit {
    let mut sorted = audit.clone();
    if let Some(AuditDetails { issues }) = sorted.details.as_mut() {
        issues.sort_by(compare_issues);
    }
    sorted
}

/// Sort a plugin's audits (with their issues) and groups
pub fn sort_plugin(plugin: &ScoredPluginReport) -> ScoredPluginReport {
    let mut sorted = plugin.clone();
    sorted.audits = plugin.audits.iter().map(sort_audit_issues).collect();
    sorted.audits.sort_by(compare_audits);
    sorted.groups.sort_by(compare_groups);
    sorted
}

/// Return a copy of `report` with every member list in canonical order.
///
/// Fails only when a category ref does not resolve within the report.
pub fn sort_report(report: &ScoredReport) -> Result<ScoredReport, ScoringError> {
    let index = ScoredIndex::build(&report.plugins);

    let mut categories = Vec::with_capacity(report.categories.len());
    for category in &report.categories {
        let entries = resolve_entries(category, &index)?;
        let mut paired: Vec<(CategoryEntry, &CategoryRef)> =
            entries.into_iter().zip(category.refs.iter()).collect();
        paired.sort_by(|(a, _), (b, _)| compare_category_entries(a, b));

        let mut sorted = category.clone();
        sorted.refs = paired.into_iter().map(|(_, r)| r.clone()).collect();
        categories.push(sorted);
    }

    let mut sorted = report.clone();
    sorted.plugins = report.plugins.iter().map(sort_plugin).collect();
    sorted.categories = categories;
    Ok(sorted)
}
