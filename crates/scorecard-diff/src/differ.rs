//! Report differ
//!
//! Aligns two scored reports by identity: `slug` for categories and
//! `(plugin, slug)` for groups and audits. Lookups are keyed maps built once
//! per report and kind.
//!
//! Ordering: `changed`, `unchanged` and `added` follow the `after` report,
//! `removed` follows the `before` report.

use crate::diff::{
    AuditChange, AuditResult, CategoryChange, CategoryResult, CommitPair, DisplayValueDelta,
    GroupChange, GroupResult, NumericDelta, Partition, PluginMeta, ReportsDiff,
};
use scorecard_core::{
    Audit, Diagnostic, DiagnosticCode, Diagnostics, DuplicateKey, EntityKind, ScoredCategory,
    ScoredGroup, ScoredPluginReport, ScoredReport,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Diff plus the diagnostics recorded while building it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffOutcome {
    pub diff: ReportsDiff,
    pub diagnostics: Diagnostics,
}

/// Compare two scored reports
pub fn diff_reports(before: &ScoredReport, after: &ScoredReport) -> DiffOutcome {
    let mut diagnostics = Diagnostics::new();
    let diff = diff_reports_into(before, after, &mut diagnostics);
    DiffOutcome { diff, diagnostics }
}

/// Compare two scored reports, recording problems in `diagnostics`.
///
/// Never fails: a duplicate identity key keeps its first occurrence and
/// records a warning.
pub fn diff_reports_into(
    before: &ScoredReport,
    after: &ScoredReport,
    diagnostics: &mut Diagnostics,
) -> ReportsDiff {
    let categories = partition(
        Keyed::build(category_views(before), "before", diagnostics),
        Keyed::build(category_views(after), "after", diagnostics),
    );
    let groups = partition(
        Keyed::build(group_views(before), "before", diagnostics),
        Keyed::build(group_views(after), "after", diagnostics),
    );
    let audits = partition(
        Keyed::build(audit_views(before), "before", diagnostics),
        Keyed::build(audit_views(after), "after", diagnostics),
    );

    tracing::debug!(
        categories_changed = categories.changed.len(),
        groups_changed = groups.changed.len(),
        audits_changed = audits.changed.len(),
        audits_added = audits.added.len(),
        audits_removed = audits.removed.len(),
        "diffed reports"
    );

    let commits = match (&before.commit, &after.commit) {
        (Some(b), Some(a)) => Some(CommitPair {
            before: b.clone(),
            after: a.clone(),
        }),
        _ => None,
    };

    ReportsDiff {
        commits,
        package_name: after.package_name.clone(),
        version: after.version.clone(),
        categories,
        groups,
        audits,
    }
}

/// Identity of a tracked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Identity<'a> {
    plugin: Option<&'a str>,
    slug: &'a str,
}

impl fmt::Display for Identity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.plugin {
            Some(plugin) => write!(f, "{}/{}", plugin, self.slug),
            None => write!(f, "{}", self.slug),
        }
    }
}

/// One entity kind as seen by the differ
trait Tracked<'a>: Copy {
    const KIND: EntityKind;
    type Result;
    type Change;

    fn identity(&self) -> Identity<'a>;
    fn score(&self) -> f64;
    fn result(&self) -> Self::Result;
    /// `None` when the tracked fields are strictly equal
    fn change(before: &Self, after: &Self) -> Option<Self::Change>;
}

#[derive(Clone, Copy)]
struct CategoryView<'a>(&'a ScoredCategory);

#[derive(Clone, Copy)]
struct GroupView<'a> {
    plugin: &'a ScoredPluginReport,
    group: &'a ScoredGroup,
}

#[derive(Clone, Copy)]
struct AuditView<'a> {
    plugin: &'a ScoredPluginReport,
    audit: &'a Audit,
}

fn category_views(report: &ScoredReport) -> impl Iterator<Item = CategoryView<'_>> {
    report.categories.iter().map(CategoryView)
}

fn group_views(report: &ScoredReport) -> impl Iterator<Item = GroupView<'_>> {
    report
        .plugins
        .iter()
        .flat_map(|plugin| plugin.groups.iter().map(move |group| GroupView { plugin, group }))
}

fn audit_views(report: &ScoredReport) -> impl Iterator<Item = AuditView<'_>> {
    report
        .plugins
        .iter()
        .flat_map(|plugin| plugin.audits.iter().map(move |audit| AuditView { plugin, audit }))
}

fn plugin_meta(plugin: &ScoredPluginReport) -> PluginMeta {
    PluginMeta {
        slug: plugin.slug.clone(),
        title: plugin.title.clone(),
    }
}

impl<'a> Tracked<'a> for CategoryView<'a> {
    const KIND: EntityKind = EntityKind::Category;
    type Result = CategoryResult;
    type Change = CategoryChange;

    fn identity(&self) -> Identity<'a> {
        Identity {
            plugin: None,
            slug: &self.0.slug,
        }
    }

    fn score(&self) -> f64 {
        self.0.score
    }

    fn result(&self) -> CategoryResult {
        CategoryResult {
            slug: self.0.slug.clone(),
            title: self.0.title.clone(),
            score: self.0.score,
        }
    }

    fn change(before: &Self, after: &Self) -> Option<CategoryChange> {
        if before.0.score == after.0.score {
            return None;
        }
        Some(CategoryChange {
            slug: after.0.slug.clone(),
            title: after.0.title.clone(),
            scores: NumericDelta::new(before.0.score, after.0.score),
        })
    }
}

impl<'a> Tracked<'a> for GroupView<'a> {
    const KIND: EntityKind = EntityKind::Group;
    type Result = GroupResult;
    type Change = GroupChange;

    fn identity(&self) -> Identity<'a> {
        Identity {
            plugin: Some(self.plugin.slug.as_str()),
            slug: &self.group.slug,
        }
    }

    fn score(&self) -> f64 {
        self.group.score
    }

    fn result(&self) -> GroupResult {
        GroupResult {
            plugin: plugin_meta(self.plugin),
            slug: self.group.slug.clone(),
            title: self.group.title.clone(),
            score: self.group.score,
        }
    }

    fn change(before: &Self, after: &Self) -> Option<GroupChange> {
        if before.group.score == after.group.score {
            return None;
        }
        Some(GroupChange {
            plugin: plugin_meta(after.plugin),
            slug: after.group.slug.clone(),
            title: after.group.title.clone(),
            scores: NumericDelta::new(before.group.score, after.group.score),
        })
    }
}

impl<'a> Tracked<'a> for AuditView<'a> {
    const KIND: EntityKind = EntityKind::Audit;
    type Result = AuditResult;
    type Change = AuditChange;

    fn identity(&self) -> Identity<'a> {
        Identity {
            plugin: Some(self.plugin.slug.as_str()),
            slug: &self.audit.slug,
        }
    }

    fn score(&self) -> f64 {
        self.audit.score
    }

    fn result(&self) -> AuditResult {
        AuditResult {
            plugin: plugin_meta(self.plugin),
            slug: self.audit.slug.clone(),
            title: self.audit.title.clone(),
            score: self.audit.score,
            value: self.audit.value,
            display_value: self.audit.display_value.clone(),
        }
    }

    fn change(before: &Self, after: &Self) -> Option<AuditChange> {
        let (b, a) = (before.audit, after.audit);
        let display_changed = b.display_value != a.display_value;
        if b.score == a.score && b.value == a.value && !display_changed {
            return None;
        }
        Some(AuditChange {
            plugin: plugin_meta(after.plugin),
            slug: a.slug.clone(),
            title: a.title.clone(),
            scores: NumericDelta::new(b.score, a.score),
            values: NumericDelta::new(b.value, a.value),
            display_values: display_changed.then(|| DisplayValueDelta {
                before: b.display_value.clone(),
                after: a.display_value.clone(),
            }),
        })
    }
}

/// Entities of one kind in report order, first occurrence per identity
struct Keyed<'a, T> {
    items: Vec<(Identity<'a>, T)>,
    positions: HashMap<Identity<'a>, usize>,
}

impl<'a, T: Tracked<'a>> Keyed<'a, T> {
    fn build(views: impl Iterator<Item = T>, side: &str, diagnostics: &mut Diagnostics) -> Self {
        let mut items = Vec::new();
        let mut positions = HashMap::new();

        for view in views {
            let identity = view.identity();
            if positions.contains_key(&identity) {
                let duplicate = DuplicateKey {
                    kind: T::KIND,
                    key: identity.to_string(),
                };
                diagnostics.push(Diagnostic::duplicate_key(&duplicate, side));
                continue;
            }

            let score = view.score();
            if !(0.0..=1.0).contains(&score) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::ScoreOutOfRange,
                    identity.to_string(),
                    format!("{} score {} in {} report is outside [0, 1]", T::KIND, score, side),
                ));
            }

            positions.insert(identity, items.len());
            items.push((identity, view));
        }

        Self { items, positions }
    }

    fn get(&self, identity: &Identity<'a>) -> Option<&T> {
        self.positions.get(identity).map(|&position| &self.items[position].1)
    }

    fn contains(&self, identity: &Identity<'a>) -> bool {
        self.positions.contains_key(identity)
    }
}

fn partition<'a, T: Tracked<'a>>(
    before: Keyed<'a, T>,
    after: Keyed<'a, T>,
) -> Partition<T::Result, T::Change> {
    let mut out = Partition::new();

    for (identity, current) in &after.items {
        match before.get(identity) {
            None => out.added.push(current.result()),
            Some(previous) => match T::change(previous, current) {
                Some(change) => out.changed.push(change),
                None => out.unchanged.push(current.result()),
            },
        }
    }

    for (identity, previous) in &before.items {
        if !after.contains(identity) {
            out.removed.push(previous.result());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_core::{Commit, DiagnosticLevel};

    fn report(plugins: Vec<ScoredPluginReport>, categories: Vec<ScoredCategory>) -> ScoredReport {
        ScoredReport {
            package_name: "@acme/web".to_string(),
            version: "1.0.0".to_string(),
            date: "2026-04-01T10:00:00Z".parse().unwrap(),
            duration: 1200,
            commit: None,
            plugins,
            categories,
        }
    }

    fn plugin(slug: &str, audits: Vec<Audit>, groups: Vec<ScoredGroup>) -> ScoredPluginReport {
        ScoredPluginReport {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            icon: None,
            description: None,
            docs_url: None,
            audits,
            groups,
        }
    }

    fn group(slug: &str, score: f64) -> ScoredGroup {
        ScoredGroup {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: None,
            refs: vec![],
            score,
        }
    }

    fn category(slug: &str, score: f64) -> ScoredCategory {
        ScoredCategory {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: None,
            is_binary: false,
            refs: vec![],
            score,
        }
    }

    #[test]
    fn test_changed_category() {
        let before = report(vec![], vec![category("perf", 0.7)]);
        let after = report(vec![], vec![category("perf", 0.66)]);

        let outcome = diff_reports(&before, &after);
        let categories = &outcome.diff.categories;

        assert_eq!(categories.changed.len(), 1);
        assert!(categories.unchanged.is_empty());
        assert!(categories.added.is_empty());
        assert!(categories.removed.is_empty());

        let change = &categories.changed[0];
        assert_eq!(change.slug, "perf");
        assert_eq!(change.scores.before, 0.7);
        assert_eq!(change.scores.after, 0.66);
        assert!((change.scores.diff - -0.04).abs() < 1e-9);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_display_value_only_change() {
        let before = report(
            vec![plugin("lh", vec![Audit::new("lcp", "LCP", 1.0, 1.0).with_display_value("1 s")], vec![])],
            vec![],
        );
        let after = report(
            vec![plugin("lh", vec![Audit::new("lcp", "LCP", 1.0, 1.0).with_display_value("1.0 s")], vec![])],
            vec![],
        );

        let diff = diff_reports(&before, &after).diff;
        let change = &diff.audits.changed[0];
        assert_eq!(change.scores.diff, 0.0);
        assert_eq!(change.values.diff, 0.0);
        assert_eq!(
            change.display_values,
            Some(DisplayValueDelta {
                before: Some("1 s".to_string()),
                after: Some("1.0 s".to_string()),
            })
        );
    }

    #[test]
    fn test_display_values_omitted_when_equal() {
        let before = report(
            vec![plugin("lh", vec![Audit::new("lcp", "LCP", 0.5, 2.0).with_display_value("2 s")], vec![])],
            vec![],
        );
        let after = report(
            vec![plugin("lh", vec![Audit::new("lcp", "LCP", 0.25, 2.0).with_display_value("2 s")], vec![])],
            vec![],
        );

        let diff = diff_reports(&before, &after).diff;
        assert_eq!(diff.audits.changed[0].display_values, None);
        assert_eq!(diff.audits.changed[0].scores.diff, -0.25);
    }

    #[test]
    fn test_unchanged_audit_and_group() {
        let both = report(
            vec![plugin("lh", vec![Audit::new("lcp", "LCP", 0.5, 2.0)], vec![group("perf", 0.5)])],
            vec![category("web", 0.5)],
        );

        let diff = diff_reports(&both, &both).diff;
        assert_eq!(diff.audits.unchanged.len(), 1);
        assert_eq!(diff.groups.unchanged.len(), 1);
        assert_eq!(diff.categories.unchanged.len(), 1);
        assert!(!diff.has_changes());
    }

    #[test]
    fn test_same_audit_slug_in_different_plugins() {
        let before = report(
            vec![
                plugin("eslint", vec![Audit::new("size", "Size", 1.0, 1.0)], vec![]),
                plugin("bundle", vec![Audit::new("size", "Size", 0.5, 9.0)], vec![]),
            ],
            vec![],
        );

        let outcome = diff_reports(&before, &before);
        assert_eq!(outcome.diff.audits.unchanged.len(), 2);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_key_keeps_first_and_warns() {
        let before = report(
            vec![plugin(
                "eslint",
                vec![Audit::new("a", "A", 0.5, 1.0), Audit::new("a", "A dup", 0.0, 5.0)],
                vec![],
            )],
            vec![],
        );
        let after = report(vec![plugin("eslint", vec![Audit::new("a", "A", 0.5, 1.0)], vec![])], vec![]);

        let outcome = diff_reports(&before, &after);
        assert_eq!(outcome.diff.audits.unchanged.len(), 1);
        assert_eq!(outcome.diff.audits.total(), 1);

        let warnings: Vec<_> = outcome.diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, DiagnosticCode::DuplicateKey);
        assert_eq!(warnings[0].level, DiagnosticLevel::Warning);
        assert_eq!(warnings[0].subject, "eslint/a");
        assert!(warnings[0].message.contains("before"));
    }

    #[test]
    fn test_score_out_of_range_is_reported() {
        let before = report(vec![], vec![category("perf", 1.5)]);
        let outcome = diff_reports(&before, &before);

        assert_eq!(outcome.diagnostics.with_code(DiagnosticCode::ScoreOutOfRange).len(), 2);
        assert_eq!(outcome.diff.categories.unchanged.len(), 1);
    }

    #[test]
    fn test_commits_pass_through() {
        let commit = |hash: &str| Commit {
            hash: hash.to_string(),
            message: "chore".to_string(),
            author: "dev".to_string(),
            date: "2026-04-01T09:00:00Z".parse().unwrap(),
        };
        let mut before = report(vec![], vec![]);
        let mut after = report(vec![], vec![]);
        assert_eq!(diff_reports(&before, &after).diff.commits, None);

        before.commit = Some(commit("abc"));
        after.commit = Some(commit("def"));
        let commits = diff_reports(&before, &after).diff.commits.unwrap();
        assert_eq!(commits.before.hash, "abc");
        assert_eq!(commits.after.hash, "def");
    }
}
