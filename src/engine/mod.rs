//! Decision orchestration
//!
//! Sequences the full pipeline: aggregate, gate on consistency, normalize
//! and derive context, classify, adjust, message, estimate confidence,
//! select follow-ups, assemble the decision record. Every step is a pure
//! function of its inputs plus the engine's immutable configuration, so
//! identical inputs always produce identical records.

use crate::adjust;
use crate::classify;
use crate::config::EngineConfig;
use crate::context::{self, RawContext};
use crate::core::{
    round3, AnalysisDetails, Consistency, DecisionRecord, FollowupPlan, ImageObservation,
    DISCLAIMER,
};
use crate::errors::EngineError;
use crate::followup;
use crate::risk;
use crate::scoring;
use im::Vector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const INCONSISTENT_MESSAGE: &str =
    "Multiple images show inconsistent results. Please upload clearer images.";
const RETAKE_INSTRUCTION: &str =
    "Please upload 2-3 new well-lit, focused images from consistent distance.";
const INCONSISTENT_FACTOR: &str = "High score disagreement across uploaded images";
const INCONSISTENT_REASONING: &str =
    "Multi-image aggregation blocked due to high disagreement between predictions.";
const CONSISTENT_FACTOR: &str = "Consistent model scores across multiple images";
const SUCCESS_REASONING: &str =
    "Final score combines weighted multi-image model score with capped deterministic context adjustment.";

/// One engine invocation, as read from a request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub images: Vec<ImageObservation>,
    #[serde(default)]
    pub context: Option<RawContext>,
    #[serde(default)]
    pub followup_answers: Option<RawContext>,
}

/// The decision engine: immutable configuration plus pure functions.
///
/// Safe to share across threads and call concurrently; it holds no
/// mutable state beyond construction-time constants.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one full evaluation over the collected image observations and
    /// optional caller context.
    ///
    /// Partial observation lists are not accepted; the caller must collect
    /// every per-image result before invoking the engine.
    pub fn evaluate(
        &self,
        images: &[ImageObservation],
        raw_context: Option<&RawContext>,
        followup_answers: Option<&RawContext>,
    ) -> Result<DecisionRecord, EngineError> {
        let scores: Vec<f64> = images.iter().map(|obs| obs.risk_score).collect();
        let aggregation = scoring::aggregate(&scores, &self.config.aggregation)?;

        let individual_scores: Vector<f64> = scores.iter().copied().map(round3).collect();

        if aggregation.is_inconsistent {
            log::info!(
                "inconsistent analysis: spread {:.3} across {} images",
                aggregation.spread,
                images.len()
            );
            return Ok(DecisionRecord::InconsistentAnalysis {
                message: INCONSISTENT_MESSAGE.to_string(),
                contributing_factors: Vector::from(vec![INCONSISTENT_FACTOR.to_string()]),
                followup: FollowupPlan {
                    requires_followup: true,
                    questions: Vector::from(vec![RETAKE_INSTRUCTION.to_string()]),
                    items: Vector::new(),
                },
                details: AnalysisDetails {
                    image_count: images.len(),
                    individual_scores,
                    score_spread: round3(aggregation.spread),
                    consistency: Consistency::Inconsistent,
                    context_adjustment: 0.0,
                },
                reasoning: INCONSISTENT_REASONING.to_string(),
                disclaimer: DISCLAIMER.to_string(),
            });
        }

        let validated = context::validate(raw_context)?;
        let derived = context::derive(validated);

        let top_label = most_frequent_label(images);
        let bucket = classify::classify(top_label, &derived);

        let adjusted = adjust::adjust(
            aggregation.aggregate_score,
            &derived,
            bucket,
            &self.config.adjustment,
        );
        let messaging = risk::build_risk_messaging(adjusted.score);

        let has_explainability = images.iter().any(|obs| obs.explainability.is_some());
        let confidence = risk::confidence::estimate(
            images.len(),
            aggregation.spread,
            &derived,
            has_explainability,
            bucket,
            &self.config.confidence,
        );

        let answered = answered_keys(followup_answers);
        let questions = followup::select(
            bucket,
            &derived,
            &answered,
            messaging.tier,
            &self.config.followup,
        );

        let mut contributing_factors = adjusted.contributing_factors.clone();
        if images.len() > 1 {
            contributing_factors.push_back(CONSISTENT_FACTOR.to_string());
        }

        let model_explainability = images.iter().find_map(|obs| obs.explainability.clone());

        log::info!(
            "decision: bucket={} score={:.3} tier={} confidence={:.2}",
            bucket.as_str(),
            adjusted.score,
            messaging.tier,
            confidence
        );

        Ok(DecisionRecord::Success {
            final_score: adjusted.score,
            risk_tier: messaging.tier,
            bucket,
            confidence,
            top_label: top_label.to_string(),
            risk_message: messaging.message,
            recommendation: messaging.recommendation,
            contributing_factors,
            followup: FollowupPlan::from_questions(questions),
            details: AnalysisDetails {
                image_count: images.len(),
                individual_scores,
                score_spread: round3(aggregation.spread),
                consistency: Consistency::Consistent,
                context_adjustment: round3(adjusted.adjustment),
            },
            reasoning: SUCCESS_REASONING.to_string(),
            model_explainability,
            disclaimer: DISCLAIMER.to_string(),
        })
    }

    /// Convenience wrapper over [`DecisionEngine::evaluate`] for a parsed
    /// request payload.
    pub fn evaluate_request(
        &self,
        request: &EvaluationRequest,
    ) -> Result<DecisionRecord, EngineError> {
        self.evaluate(
            &request.images,
            request.context.as_ref(),
            request.followup_answers.as_ref(),
        )
    }
}

/// Most frequent label across observations; first encountered wins ties.
fn most_frequent_label(images: &[ImageObservation]) -> &str {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for obs in images {
        *counts.entry(obs.label.as_str()).or_insert(0) += 1;
    }

    let mut best = "";
    let mut best_count = 0;
    for obs in images {
        let count = counts[obs.label.as_str()];
        if count > best_count {
            best = obs.label.as_str();
            best_count = count;
        }
    }
    best
}

/// Keys from the follow-up answers map whose value is an actual answer
/// (non-null and non-empty).
fn answered_keys(followup_answers: Option<&RawContext>) -> BTreeSet<String> {
    let Some(answers) = followup_answers else {
        return BTreeSet::new();
    };
    answers
        .iter()
        .filter(|(_, value)| is_answer_present(value))
        .map(|(key, _)| key.clone())
        .collect()
}

fn is_answer_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_frequent_label_breaks_ties_by_first_seen() {
        let images = vec![
            ImageObservation::new(0.5, "eczema"),
            ImageObservation::new(0.5, "melanoma"),
        ];
        assert_eq!(most_frequent_label(&images), "eczema");

        let images = vec![
            ImageObservation::new(0.5, "eczema"),
            ImageObservation::new(0.5, "melanoma"),
            ImageObservation::new(0.5, "melanoma"),
        ];
        assert_eq!(most_frequent_label(&images), "melanoma");
    }

    #[test]
    fn blank_followup_answers_do_not_count() {
        let mut answers = RawContext::new();
        answers.insert("pain".to_string(), serde_json::json!(true));
        answers.insert("fever".to_string(), serde_json::json!(null));
        answers.insert("pus".to_string(), serde_json::json!("  "));
        answers.insert("swelling".to_string(), serde_json::json!("yes"));

        let keys = answered_keys(Some(&answers));
        assert!(keys.contains("pain"));
        assert!(keys.contains("swelling"));
        assert!(!keys.contains("fever"));
        assert!(!keys.contains("pus"));
    }

    #[test]
    fn no_observations_is_an_error() {
        let engine = DecisionEngine::new();
        assert_eq!(
            engine.evaluate(&[], None, None).unwrap_err(),
            EngineError::NoObservations
        );
    }
}
