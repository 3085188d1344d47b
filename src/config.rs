use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tuning knobs for analysis, expansion and scoring.
///
/// Every field has a default, so an empty TOML file (or no file at all)
/// yields the stock behaviour.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignerConfig {
    /// Seed for the expansion RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub analysis: AnalysisThresholds,
    pub expansion: ExpansionConfig,
    pub scoring: ScoringConfig,
}

/// Heuristic thresholds used by the conflict analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// An item is critical when its popularity is at least this share of all people.
    pub critical_share: f64,
    /// Only people with at most this many preferences can be at risk.
    pub at_risk_max_preferences: usize,
    /// Share of a short list that must be contested for the person to be at risk.
    pub at_risk_conflict_share: f64,
    /// Warn when `items - people` falls below this.
    pub min_spare_items: i64,
    /// How many entries the "most requested" table keeps.
    pub most_requested_limit: usize,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            critical_share: 0.6,
            at_risk_max_preferences: 2,
            at_risk_conflict_share: 0.8,
            min_spare_items: 2,
            most_requested_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Preference lists are grown to `min(target_len, number of items)`.
    pub target_len: usize,
    /// Jaccard similarity a neighbour must exceed to vote.
    pub similarity_threshold: f64,
    /// Probability that the balanced method follows the popularity rule.
    pub balanced_popularity_share: f64,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            target_len: 4,
            similarity_threshold: 0.3,
            balanced_popularity_share: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Penalty added by the evaluator for a person outside their list.
    pub unmatched_penalty: u32,
    /// Penalty used for the total cost reported by strategy comparison.
    pub comparison_penalty: u32,
    /// Sentinel cost in the optimal solver's matrix.
    pub solver_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            unmatched_penalty: 10,
            comparison_penalty: 1000,
            solver_penalty: 1000,
        }
    }
}

impl AssignerConfig {
    /// Loads and validates a config from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let shares = [
            ("analysis.critical_share", self.analysis.critical_share),
            ("analysis.at_risk_conflict_share", self.analysis.at_risk_conflict_share),
            ("expansion.similarity_threshold", self.expansion.similarity_threshold),
            ("expansion.balanced_popularity_share", self.expansion.balanced_popularity_share),
        ];
        for (name, value) in shares {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.expansion.target_len == 0 {
            return Err(ConfigError::Invalid(
                "expansion.target_len must be at least 1".to_string(),
            ));
        }
        if self.scoring.unmatched_penalty == 0
            || self.scoring.comparison_penalty == 0
            || self.scoring.solver_penalty == 0
        {
            return Err(ConfigError::Invalid(
                "scoring penalties must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
