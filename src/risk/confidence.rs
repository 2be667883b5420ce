//! Calibration confidence estimation
//!
//! Confidence reflects how much evidence backed the decision: score
//! agreement across images, number of images, completeness of the
//! bucket-relevant context fields, and whether the model supplied
//! explainability data.

use crate::config::ConfidenceConfig;
use crate::context::DerivedContext;
use crate::core::{round2, ConditionBucket};

/// Context fields the estimate expects answered, per bucket.
const REQUIRED_FIELDS: &[(ConditionBucket, &[&str])] = &[
    (
        ConditionBucket::Oncologic,
        &[
            "duration_days",
            "rapid_growth",
            "bleeding",
            "irregular_border",
            "multi_color",
            "family_history_skin_cancer",
        ],
    ),
    (
        ConditionBucket::Fungal,
        &["duration_days", "itching", "scaling", "ring_shape"],
    ),
    (
        ConditionBucket::Bacterial,
        &["duration_days", "pain", "bleeding"],
    ),
    (
        ConditionBucket::Inflammatory,
        &["duration_days", "rapid_growth", "bleeding"],
    ),
    (
        ConditionBucket::General,
        &["duration_days", "rapid_growth", "bleeding"],
    ),
];

/// Fields the estimate expects answered for a bucket.
pub fn required_fields(bucket: ConditionBucket) -> &'static [&'static str] {
    REQUIRED_FIELDS
        .iter()
        .find(|(b, _)| *b == bucket)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[])
}

/// Estimate calibration confidence for one decision.
///
/// Clamped to the configured floor/ceiling and rounded to 2 decimals.
pub fn estimate(
    image_count: usize,
    spread: f64,
    context: &DerivedContext,
    has_explainability: bool,
    bucket: ConditionBucket,
    config: &ConfidenceConfig,
) -> f64 {
    let mut confidence = config.base;

    confidence -= (spread * config.spread_weight).min(config.spread_penalty_cap);

    if image_count == 1 {
        confidence -= config.single_image_penalty;
    }

    let missing = required_fields(bucket)
        .iter()
        .filter(|field| !context.answered(field))
        .count();
    confidence -= missing as f64 * config.missing_field_penalty;

    if has_explainability {
        confidence += config.explainability_bonus;
    }

    round2(confidence.clamp(config.floor, config.ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{derive, validate};
    use serde_json::json;

    fn derived(value: serde_json::Value) -> DerivedContext {
        let raw = value.as_object().expect("object").clone();
        derive(validate(Some(&raw)).unwrap())
    }

    fn config() -> ConfidenceConfig {
        ConfidenceConfig::default()
    }

    #[test]
    fn full_context_multi_image_is_near_base() {
        let context = derived(json!({
            "duration_days": 10,
            "rapid_growth": false,
            "bleeding": false,
        }));
        let confidence = estimate(2, 0.0, &context, false, ConditionBucket::General, &config());
        assert_eq!(confidence, 0.9);
    }

    #[test]
    fn single_image_and_missing_fields_subtract() {
        let context = derived(json!({}));
        // 0.9 - 0.05 (single) - 3 * 0.04 (missing) = 0.73
        let confidence = estimate(1, 0.0, &context, false, ConditionBucket::General, &config());
        assert_eq!(confidence, 0.73);
    }

    #[test]
    fn oncologic_bucket_requires_six_fields() {
        assert_eq!(required_fields(ConditionBucket::Oncologic).len(), 6);
        let context = derived(json!({}));
        // 0.9 - 0.05 - 6 * 0.04 = 0.61
        let confidence = estimate(1, 0.0, &context, false, ConditionBucket::Oncologic, &config());
        assert_eq!(confidence, 0.61);
    }

    #[test]
    fn spread_penalty_is_capped() {
        let context = derived(json!({
            "duration_days": 10,
            "rapid_growth": false,
            "bleeding": false,
        }));
        // spread 0.5 would be a 0.30 penalty; the cap keeps it at 0.25
        let confidence = estimate(2, 0.5, &context, false, ConditionBucket::General, &config());
        assert_eq!(confidence, 0.65);
    }

    #[test]
    fn explainability_adds_a_small_bonus() {
        let context = derived(json!({
            "duration_days": 10,
            "rapid_growth": false,
            "bleeding": false,
        }));
        let without = estimate(2, 0.0, &context, false, ConditionBucket::General, &config());
        let with = estimate(2, 0.0, &context, true, ConditionBucket::General, &config());
        assert_eq!(with, without + 0.03);
    }

    #[test]
    fn confidence_is_clamped_to_floor_and_ceiling() {
        let context = derived(json!({}));
        let low = estimate(1, 1.0, &context, false, ConditionBucket::Oncologic, &config());
        assert_eq!(low, 0.5);

        let full = derived(json!({
            "duration_days": 10,
            "rapid_growth": true,
            "bleeding": true,
            "irregular_border": true,
            "multi_color": true,
            "family_history_skin_cancer": true,
        }));
        let high = estimate(3, 0.0, &full, true, ConditionBucket::Oncologic, &config());
        assert_eq!(high, 0.93);
    }

    #[test]
    fn derived_signals_count_as_answered() {
        let context = derived(json!({
            "context_text": "It keeps bleeding and is growing fast.",
            "duration_days": 5,
        }));
        // bleeding and rapid_growth inferred from text: nothing missing
        let confidence = estimate(2, 0.0, &context, false, ConditionBucket::General, &config());
        assert_eq!(confidence, 0.9);
    }
}
