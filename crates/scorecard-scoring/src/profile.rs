//! Engine profiles
//!
//! Behavioural switches for the scorer, loadable from YAML or JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How categories flagged `isBinary` are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryCategoryRule {
    /// The flag is a presentation hint; the weighted average applies
    #[default]
    WeightedAverage,
    /// 1.0 when every ref with positive weight scores exactly 1.0, else 0.0
    AllOrNothing,
}

/// Engine profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineProfile {
    /// Profile name (e.g., "standard@1.0")
    pub name: String,

    /// Scoring rule for binary categories
    pub binary_categories: BinaryCategoryRule,

    /// Run the sorter after scoring in [`crate::Scorer::evaluate`]
    pub sort_reports: bool,
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("PROFILE/yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("PROFILE/json: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineProfile {
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            binary_categories: BinaryCategoryRule::WeightedAverage,
            sort_reports: true,
        }
    }

    /// Binary categories pass or fail as a whole
    pub fn strict_binary() -> Self {
        Self {
            name: "strict-binary@1.0".to_string(),
            binary_categories: BinaryCategoryRule::AllOrNothing,
            sort_reports: true,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get profile by mode name
    pub fn for_mode(mode: &str) -> Self {
        match mode {
            "strict-binary" => Self::strict_binary(),
            _ => Self::standard(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::standard()
    }
}
