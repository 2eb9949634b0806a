//! Diff statistics for summaries and CI gates

use crate::diff::{Partition, ReportsDiff, ScoreChange};
use serde::{Deserialize, Serialize};

/// Counts for one entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
    /// Changed entries whose score went up
    pub improved: usize,
    /// Changed entries whose score went down
    pub regressed: usize,
}

impl KindSummary {
    pub fn of<R, C: ScoreChange>(partition: &Partition<R, C>) -> Self {
        let improved = partition.changed.iter().filter(|c| c.scores().diff > 0.0).count();
        let regressed = partition.changed.iter().filter(|c| c.scores().diff < 0.0).count();
        Self {
            added: partition.added.len(),
            removed: partition.removed.len(),
            changed: partition.changed.len(),
            unchanged: partition.unchanged.len(),
            improved,
            regressed,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.changed + self.unchanged
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub categories: KindSummary,
    pub groups: KindSummary,
    pub audits: KindSummary,
}

impl DiffSummary {
    pub fn has_regressions(&self) -> bool {
        self.categories.regressed + self.groups.regressed + self.audits.regressed > 0
    }
}

impl ReportsDiff {
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            categories: KindSummary::of(&self.categories),
            groups: KindSummary::of(&self.groups),
            audits: KindSummary::of(&self.audits),
        }
    }
}
