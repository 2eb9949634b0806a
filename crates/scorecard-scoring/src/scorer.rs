//! Weighted scoring of groups and categories
//!
//! Every aggregate score is `Σ(weight × score) / Σ(weight)` over the owner's
//! refs, summed in declared order so identical input yields identical bits.

use crate::profile::{BinaryCategoryRule, EngineProfile};
use crate::resolver::{GroupScores, PluginIndex, ReportIndex};
use crate::sorter::sort_report;
use scorecard_core::{
    Category, ConfigurationError, DuplicateKey, EntityKind, EntityRef, Group, ReferenceError,
    Report, ScoredCategory, ScoredGroup, ScoredPluginReport, ScoredReport, ScoringError,
};
use std::collections::HashSet;

/// Weighted average of `refs`.
///
/// Every ref is resolved (a zero weight does not excuse a dangling ref).
/// Fails on an empty list, a negative or non-finite weight, or a zero total
/// weight.
pub fn weighted_average<T>(
    refs: &[T],
    owner: &EntityRef,
    weight: impl Fn(&T) -> f64,
    mut score: impl FnMut(&T) -> Result<f64, ScoringError>,
) -> Result<f64, ScoringError> {
    if refs.is_empty() {
        return Err(ConfigurationError::EmptyRefs {
            owner: owner.clone(),
        }
        .into());
    }

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for r in refs {
        let w = weight(r);
        if !w.is_finite() || w < 0.0 {
            return Err(ConfigurationError::InvalidWeight {
                owner: owner.clone(),
                weight: w,
            }
            .into());
        }
        let s = score(r)?;
        numerator += w * s;
        denominator += w;
    }

    if denominator == 0.0 {
        return Err(ConfigurationError::ZeroTotalWeight {
            owner: owner.clone(),
        }
        .into());
    }
    Ok(numerator / denominator)
}

/// Score of a group over the audits of its own plugin
pub fn group_score(group: &Group, plugin: &PluginIndex<'_>) -> Result<f64, ScoringError> {
    let owner = EntityRef::group(plugin.slug(), &group.slug);
    weighted_average(
        &group.refs,
        &owner,
        |r| r.weight,
        |r| {
            plugin
                .audit(&r.slug)
                .map(|audit| audit.score)
                .ok_or_else(|| {
                    ScoringError::from(ReferenceError::MissingAudit {
                        plugin: plugin.slug().to_string(),
                        audit: r.slug.clone(),
                        referenced_by: owner.clone(),
                    })
                })
        },
    )
}

/// Score of a category, resolving each ref against the report
pub fn category_score(category: &Category, report: &Report) -> Result<f64, ScoringError> {
    let index = ReportIndex::build(&report.plugins)?;
    Scorer::default().category_score_with(category, &index, &GroupScores::new())
}

/// Compute scores for every group and category of a report
pub fn score_report(report: &Report) -> Result<ScoredReport, ScoringError> {
    Scorer::default().score(report)
}

/// Scorer configured by an [`EngineProfile`]
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    profile: EngineProfile,
}

impl Scorer {
    pub fn new(profile: EngineProfile) -> Self {
        Self { profile }
    }

    /// Create a scorer for a named profile mode
    pub fn for_mode(mode: &str) -> Self {
        Self::new(EngineProfile::for_mode(mode))
    }

    pub fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    /// Score every group and category. Audit scores are copied untouched and
    /// the input is never modified. Any error aborts the whole report.
    pub fn score(&self, report: &Report) -> Result<ScoredReport, ScoringError> {
        let index = ReportIndex::build(&report.plugins)?;
        let mut group_scores = GroupScores::new();
        let mut plugins = Vec::with_capacity(report.plugins.len());

        for plugin_index in index.iter() {
            let plugin = plugin_index.plugin();
            let mut groups = Vec::with_capacity(plugin.groups.len());
            for group in &plugin.groups {
                let score = group_score(group, plugin_index)?;
                tracing::debug!(plugin = %plugin.slug, group = %group.slug, score, "scored group");
                group_scores.insert((plugin.slug.as_str(), group.slug.as_str()), score);
                groups.push(ScoredGroup::from_group(group, score));
            }
            plugins.push(ScoredPluginReport::from_plugin(plugin, groups));
        }

        let mut seen = HashSet::with_capacity(report.categories.len());
        let mut categories = Vec::with_capacity(report.categories.len());
        for category in &report.categories {
            if !seen.insert(category.slug.as_str()) {
                return Err(DuplicateKey {
                    kind: EntityKind::Category,
                    key: category.slug.clone(),
                }
                .into());
            }
            let score = self.category_score_with(category, &index, &group_scores)?;
            tracing::debug!(category = %category.slug, score, "scored category");
            categories.push(ScoredCategory::from_category(category, score));
        }

        Ok(ScoredReport::from_report(report, plugins, categories))
    }

    /// Score, then sort when the profile asks for it
    pub fn evaluate(&self, report: &Report) -> Result<ScoredReport, ScoringError> {
        let scored = self.score(report)?;
        if self.profile.sort_reports {
            sort_report(&scored)
        } else {
            Ok(scored)
        }
    }

    pub fn category_score_with(
        &self,
        category: &Category,
        index: &ReportIndex<'_>,
        group_scores: &GroupScores<'_>,
    ) -> Result<f64, ScoringError> {
        let owner = EntityRef::category(&category.slug);
        let mut resolved = Vec::with_capacity(category.refs.len());
        let average = weighted_average(
            &category.refs,
            &owner,
            |r| r.weight(),
            |r| {
                let score = index.resolve_cached(r, &owner, group_scores)?;
                resolved.push((r.weight(), score));
                Ok(score)
            },
        )?;

        if category.is_binary && self.profile.binary_categories == BinaryCategoryRule::AllOrNothing {
            let passed = resolved
                .iter()
                .filter(|(weight, _)| *weight > 0.0)
                .all(|(_, score)| *score == 1.0);
            return Ok(if passed { 1.0 } else { 0.0 });
        }
        Ok(average)
    }
}
