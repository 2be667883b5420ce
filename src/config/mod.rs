//! Engine configuration
//!
//! Every tunable the pipeline consumes lives here as plain data with
//! serde defaults, so tests and callers can override any constant at
//! construction time. The engine never reads the environment.

use serde::{Deserialize, Serialize};

/// Top-level configuration for one [`crate::engine::DecisionEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub aggregation: AggregationConfig,

    #[serde(default)]
    pub adjustment: AdjustmentConfig,

    #[serde(default)]
    pub confidence: ConfidenceConfig,

    #[serde(default)]
    pub followup: FollowupConfig,
}

/// Multi-image aggregation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Max allowed spread between per-image scores before the
    /// consistency gate rejects the request
    #[serde(default = "default_disagreement_threshold")]
    pub disagreement_threshold: f64,

    /// Weight of the most alarming image in the aggregate
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,

    /// Weight of the mean image score in the aggregate
    #[serde(default = "default_avg_weight")]
    pub avg_weight: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            disagreement_threshold: default_disagreement_threshold(),
            max_weight: default_max_weight(),
            avg_weight: default_avg_weight(),
        }
    }
}

fn default_disagreement_threshold() -> f64 {
    0.35
}
fn default_max_weight() -> f64 {
    0.6
}
fn default_avg_weight() -> f64 {
    0.4
}

/// Clamp bounds for the context-weighted score correction.
///
/// Non-oncologic buckets are adjusted more conservatively in both
/// directions, and carry a hard ceiling absent the two strongest
/// oncologic red flags (bleeding plus rapid growth).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    #[serde(default = "default_oncologic_min")]
    pub oncologic_min: f64,

    #[serde(default = "default_oncologic_max")]
    pub oncologic_max: f64,

    #[serde(default = "default_non_oncologic_min")]
    pub non_oncologic_min: f64,

    #[serde(default = "default_non_oncologic_max")]
    pub non_oncologic_max: f64,

    /// Score ceiling for fungal/bacterial/inflammatory buckets unless
    /// both bleeding and rapid growth are reported
    #[serde(default = "default_non_oncologic_ceiling")]
    pub non_oncologic_ceiling: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            oncologic_min: default_oncologic_min(),
            oncologic_max: default_oncologic_max(),
            non_oncologic_min: default_non_oncologic_min(),
            non_oncologic_max: default_non_oncologic_max(),
            non_oncologic_ceiling: default_non_oncologic_ceiling(),
        }
    }
}

fn default_oncologic_min() -> f64 {
    -0.12
}
fn default_oncologic_max() -> f64 {
    0.24
}
fn default_non_oncologic_min() -> f64 {
    -0.18
}
fn default_non_oncologic_max() -> f64 {
    0.16
}
fn default_non_oncologic_ceiling() -> f64 {
    0.58
}

/// Weights for the calibration confidence estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    #[serde(default = "default_confidence_base")]
    pub base: f64,

    /// Multiplier applied to the score spread
    #[serde(default = "default_spread_weight")]
    pub spread_weight: f64,

    /// Cap on the spread penalty
    #[serde(default = "default_spread_penalty_cap")]
    pub spread_penalty_cap: f64,

    /// Penalty when only one image was supplied
    #[serde(default = "default_single_image_penalty")]
    pub single_image_penalty: f64,

    /// Penalty per missing bucket-required context field
    #[serde(default = "default_missing_field_penalty")]
    pub missing_field_penalty: f64,

    /// Bonus when any image carried explainability data
    #[serde(default = "default_explainability_bonus")]
    pub explainability_bonus: f64,

    #[serde(default = "default_confidence_floor")]
    pub floor: f64,

    #[serde(default = "default_confidence_ceiling")]
    pub ceiling: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base: default_confidence_base(),
            spread_weight: default_spread_weight(),
            spread_penalty_cap: default_spread_penalty_cap(),
            single_image_penalty: default_single_image_penalty(),
            missing_field_penalty: default_missing_field_penalty(),
            explainability_bonus: default_explainability_bonus(),
            floor: default_confidence_floor(),
            ceiling: default_confidence_ceiling(),
        }
    }
}

fn default_confidence_base() -> f64 {
    0.9
}
fn default_spread_weight() -> f64 {
    0.6
}
fn default_spread_penalty_cap() -> f64 {
    0.25
}
fn default_single_image_penalty() -> f64 {
    0.05
}
fn default_missing_field_penalty() -> f64 {
    0.04
}
fn default_explainability_bonus() -> f64 {
    0.03
}
fn default_confidence_floor() -> f64 {
    0.5
}
fn default_confidence_ceiling() -> f64 {
    0.97
}

/// Follow-up selector limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupConfig {
    /// Maximum questions returned per decision
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
}

impl Default for FollowupConfig {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
        }
    }
}

fn default_max_questions() -> usize {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.aggregation.disagreement_threshold, 0.35);
        assert_eq!(config.adjustment.oncologic_max, 0.24);
        assert_eq!(config.adjustment.non_oncologic_ceiling, 0.58);
        assert_eq!(config.confidence.floor, 0.5);
        assert_eq!(config.followup.max_questions, 6);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"aggregation": {"disagreement_threshold": 0.2}}"#).unwrap();
        assert_eq!(config.aggregation.disagreement_threshold, 0.2);
        assert_eq!(config.aggregation.max_weight, 0.6);
        assert_eq!(config.adjustment, AdjustmentConfig::default());
    }
}
