//! Common type definitions used across the engine

use im::Vector;
use serde::{Deserialize, Serialize};

/// Screening disclaimer carried on every assembled decision record.
pub const DISCLAIMER: &str =
    "This is a screening result, not a diagnosis. Please consult a dermatologist.";

/// Opaque per-image explainability payload passed through from the classifier.
pub type Explainability = serde_json::Map<String, serde_json::Value>;

/// One external classifier output for a single image.
///
/// Produced once per image by the upstream model service; the engine never
/// decodes images itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObservation {
    /// Model risk score, clamped to [0, 1] during aggregation
    pub risk_score: f64,
    /// Coarse model label, e.g. "melanoma" or "suspicious_lesion"
    pub label: String,
    /// Optional opaque explainability map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explainability: Option<Explainability>,
}

impl ImageObservation {
    pub fn new(risk_score: f64, label: impl Into<String>) -> Self {
        Self {
            risk_score,
            label: label.into(),
            explainability: None,
        }
    }
}

/// Inferred clinical category driving adjustment and follow-up rules.
///
/// Variant order is the tie-break order of the classifier vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionBucket {
    Oncologic,
    Fungal,
    Bacterial,
    Inflammatory,
    General,
}

impl ConditionBucket {
    /// All buckets in classifier tie-break order.
    pub const ALL: [ConditionBucket; 5] = [
        ConditionBucket::Oncologic,
        ConditionBucket::Fungal,
        ConditionBucket::Bacterial,
        ConditionBucket::Inflammatory,
        ConditionBucket::General,
    ];

    /// Wire/key name for this bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionBucket::Oncologic => "oncologic",
            ConditionBucket::Fungal => "fungal",
            ConditionBucket::Bacterial => "bacterial",
            ConditionBucket::Inflammatory => "inflammatory",
            ConditionBucket::General => "general",
        }
    }

    /// Get the display name for this bucket.
    pub fn display_name(&self) -> &'static str {
        match self {
            ConditionBucket::Oncologic => "Oncologic",
            ConditionBucket::Fungal => "Fungal",
            ConditionBucket::Bacterial => "Bacterial",
            ConditionBucket::Inflammatory => "Inflammatory",
            ConditionBucket::General => "General",
        }
    }

    /// Buckets adjusted on the conservative (non-oncologic) track.
    pub fn is_non_oncologic(&self) -> bool {
        matches!(
            self,
            ConditionBucket::Fungal | ConditionBucket::Bacterial | ConditionBucket::Inflammatory
        )
    }
}

impl std::fmt::Display for ConditionBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier for the final calibrated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-image consistency verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Consistent,
    Inconsistent,
}

/// Result of combining per-image scores into one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub aggregate_score: f64,
    pub max_score: f64,
    pub avg_score: f64,
    pub spread: f64,
    pub is_inconsistent: bool,
}

/// Result of the bounded context-weighted score correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    /// Adjusted score, clamped to [0, 1]
    pub score: f64,
    /// Total applied adjustment after bucket clamping
    pub adjustment: f64,
    /// Human-readable factor per applied rule, in rule order
    pub contributing_factors: Vector<String>,
    pub bucket: ConditionBucket,
}

/// One catalog entry returned by the follow-up selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupQuestion {
    pub key: String,
    pub question: String,
}

/// Follow-up envelope on a decision record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupPlan {
    pub requires_followup: bool,
    /// Flat question texts, in priority order
    pub questions: Vector<String>,
    /// Structured (key, question) pairs, same order
    pub items: Vector<FollowupQuestion>,
}

impl FollowupPlan {
    pub fn from_questions(items: Vector<FollowupQuestion>) -> Self {
        Self {
            requires_followup: !items.is_empty(),
            questions: items.iter().map(|q| q.question.clone()).collect(),
            items,
        }
    }
}

/// Per-request analysis detail block carried on every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub image_count: usize,
    /// Individual model scores, rounded to 3 decimals
    pub individual_scores: Vector<f64>,
    /// Rounded to 3 decimals
    pub score_spread: f64,
    pub consistency: Consistency,
    /// Applied context adjustment, rounded to 3 decimals
    pub context_adjustment: f64,
}

/// Final output of one engine invocation.
///
/// `inconsistent_analysis` is a deliberate decision, not an error: the
/// consistency gate rejected the multi-image evidence before any context
/// weighting ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecisionRecord {
    Success {
        final_score: f64,
        risk_tier: RiskTier,
        bucket: ConditionBucket,
        confidence: f64,
        /// Most frequent per-image label
        top_label: String,
        risk_message: String,
        recommendation: String,
        contributing_factors: Vector<String>,
        followup: FollowupPlan,
        details: AnalysisDetails,
        reasoning: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model_explainability: Option<Explainability>,
        disclaimer: String,
    },
    InconsistentAnalysis {
        message: String,
        contributing_factors: Vector<String>,
        followup: FollowupPlan,
        details: AnalysisDetails,
        reasoning: String,
        disclaimer: String,
    },
}

impl DecisionRecord {
    /// Wire status string for this record.
    pub fn status(&self) -> &'static str {
        match self {
            DecisionRecord::Success { .. } => "success",
            DecisionRecord::InconsistentAnalysis { .. } => "inconsistent_analysis",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DecisionRecord::Success { .. })
    }
}

/// Clamp a score into [0, 1].
pub fn clamp01(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Round to 2 decimals (reported confidence).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 3 decimals (reported scores and adjustments).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
