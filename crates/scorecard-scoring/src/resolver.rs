//! Reference resolution
//!
//! Turns a typed ref into a concrete score using slug-keyed maps built once
//! per report. Missing targets are errors; no fallback score is invented.

use crate::scorer::group_score;
use scorecard_core::{
    Audit, CategoryRef, DuplicateKey, EntityKind, EntityRef, Group, PluginReport, ReferenceError,
    ScoringError,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Slug-keyed view of one plugin
#[derive(Debug)]
pub struct PluginIndex<'a> {
    plugin: &'a PluginReport,
    audits: HashMap<&'a str, &'a Audit>,
    groups: HashMap<&'a str, &'a Group>,
}

impl<'a> PluginIndex<'a> {
    /// Index a plugin, rejecting duplicate audit or group slugs
    pub fn build(plugin: &'a PluginReport) -> Result<Self, DuplicateKey> {
        let mut audits = HashMap::with_capacity(plugin.audits.len());
        for audit in &plugin.audits {
            insert_unique(&mut audits, &audit.slug, audit, || DuplicateKey {
                kind: EntityKind::Audit,
                key: format!("{}/{}", plugin.slug, audit.slug),
            })?;
        }

        let mut groups = HashMap::with_capacity(plugin.groups.len());
        for group in &plugin.groups {
            insert_unique(&mut groups, &group.slug, group, || DuplicateKey {
                kind: EntityKind::Group,
                key: format!("{}/{}", plugin.slug, group.slug),
            })?;
        }

        Ok(Self {
            plugin,
            audits,
            groups,
        })
    }

    pub fn slug(&self) -> &'a str {
        &self.plugin.slug
    }

    pub fn plugin(&self) -> &'a PluginReport {
        self.plugin
    }

    pub fn audit(&self, slug: &str) -> Option<&'a Audit> {
        self.audits.get(slug).copied()
    }

    pub fn group(&self, slug: &str) -> Option<&'a Group> {
        self.groups.get(slug).copied()
    }
}

/// Group scores already computed for a report, keyed by (plugin, group)
pub type GroupScores<'a> = HashMap<(&'a str, &'a str), f64>;

/// Slug-keyed view of every plugin in a report
#[derive(Debug)]
pub struct ReportIndex<'a> {
    plugins: Vec<PluginIndex<'a>>,
    by_slug: HashMap<&'a str, usize>,
}

impl<'a> ReportIndex<'a> {
    /// Index all plugins, rejecting duplicate plugin, audit or group slugs
    pub fn build(plugins: &'a [PluginReport]) -> Result<Self, ScoringError> {
        let mut indexed = Vec::with_capacity(plugins.len());
        let mut by_slug = HashMap::with_capacity(plugins.len());
        for (position, plugin) in plugins.iter().enumerate() {
            insert_unique(&mut by_slug, &plugin.slug, position, || DuplicateKey {
                kind: EntityKind::Plugin,
                key: plugin.slug.clone(),
            })?;
            indexed.push(PluginIndex::build(plugin)?);
        }
        Ok(Self {
            plugins: indexed,
            by_slug,
        })
    }

    /// Plugins in declared order
    pub fn iter(&self) -> impl Iterator<Item = &PluginIndex<'a>> {
        self.plugins.iter()
    }

    pub fn plugin(&self, slug: &str) -> Option<&PluginIndex<'a>> {
        self.by_slug.get(slug).map(|&position| &self.plugins[position])
    }

    pub fn require_plugin(
        &self,
        plugin: &str,
        referenced_by: &EntityRef,
    ) -> Result<&PluginIndex<'a>, ReferenceError> {
        self.plugin(plugin)
            .ok_or_else(|| ReferenceError::MissingPlugin {
                plugin: plugin.to_string(),
                referenced_by: referenced_by.clone(),
            })
    }

    pub fn audit(
        &self,
        plugin: &str,
        slug: &str,
        referenced_by: &EntityRef,
    ) -> Result<&'a Audit, ReferenceError> {
        self.require_plugin(plugin, referenced_by)?
            .audit(slug)
            .ok_or_else(|| ReferenceError::MissingAudit {
                plugin: plugin.to_string(),
                audit: slug.to_string(),
                referenced_by: referenced_by.clone(),
            })
    }

    pub fn group(
        &self,
        plugin: &str,
        slug: &str,
        referenced_by: &EntityRef,
    ) -> Result<&'a Group, ReferenceError> {
        self.require_plugin(plugin, referenced_by)?
            .group(slug)
            .ok_or_else(|| ReferenceError::MissingGroup {
                plugin: plugin.to_string(),
                group: slug.to_string(),
                referenced_by: referenced_by.clone(),
            })
    }

    /// Resolve a category ref to its score, computing group scores on demand
    pub fn resolve(&self, r: &CategoryRef, referenced_by: &EntityRef) -> Result<f64, ScoringError> {
        self.resolve_cached(r, referenced_by, &GroupScores::new())
    }

    /// Like [`ReportIndex::resolve`], reusing group scores from `cache` when present
    pub fn resolve_cached(
        &self,
        r: &CategoryRef,
        referenced_by: &EntityRef,
        cache: &GroupScores<'_>,
    ) -> Result<f64, ScoringError> {
        match r {
            CategoryRef::Audit { plugin, slug, .. } => {
                Ok(self.audit(plugin, slug, referenced_by)?.score)
            }
            CategoryRef::Group { plugin, slug, .. } => {
                let group = self.group(plugin, slug, referenced_by)?;
                if let Some(score) = cache.get(&(plugin.as_str(), slug.as_str())) {
                    return Ok(*score);
                }
                let plugin_index = self.require_plugin(plugin, referenced_by)?;
                group_score(group, plugin_index)
            }
        }
    }
}

/// Resolve a single ref against a report's plugins
pub fn resolve_ref(
    r: &CategoryRef,
    referenced_by: &EntityRef,
    plugins: &[PluginReport],
) -> Result<f64, ScoringError> {
    ReportIndex::build(plugins)?.resolve(r, referenced_by)
}

fn insert_unique<'a, V>(
    map: &mut HashMap<&'a str, V>,
    key: &'a str,
    value: V,
    duplicate: impl FnOnce() -> DuplicateKey,
) -> Result<(), DuplicateKey> {
    match map.entry(key) {
        Entry::Occupied(_) => Err(duplicate()),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}
