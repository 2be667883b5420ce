//! Context-weighted score adjustment
//!
//! Applies an ordered set of bucket-gated corrections to the aggregate
//! score. Oncologic and general cases take the full adjustment range;
//! fungal, bacterial and inflammatory cases are corrected more
//! conservatively in both directions and carry a hard score ceiling unless
//! both of the strongest oncologic red flags are reported.

use crate::config::AdjustmentConfig;
use crate::context::{DerivedContext, SignalKey};
use crate::core::{clamp01, AdjustmentResult, ConditionBucket};
use im::Vector;

/// Age at or above which a lesion is treated as higher risk.
const ELDERLY_AGE: u32 = 65;

/// Onset within this many days counts as recent.
const RECENT_ONSET_DAYS: u32 = 14;

/// Apply the bucket-gated context correction to an aggregate score.
pub fn adjust(
    aggregate_score: f64,
    context: &DerivedContext,
    bucket: ConditionBucket,
    config: &AdjustmentConfig,
) -> AdjustmentResult {
    let oncologic_track = !bucket.is_non_oncologic();
    let mut rules = RuleLog::default();

    if context.age().is_some_and(|age| age >= ELDERLY_AGE) && oncologic_track {
        rules.apply(0.05, "Age >= 65 reported");
    }

    if context
        .duration_days()
        .is_some_and(|days| days <= RECENT_ONSET_DAYS)
    {
        let delta = if oncologic_track { 0.05 } else { 0.03 };
        rules.apply(delta, "Recent onset reported");
    }

    if context.is_set(SignalKey::Bleeding) {
        let delta = if oncologic_track { 0.12 } else { 0.08 };
        rules.apply(delta, "Bleeding reported");
    }

    if context.is_set(SignalKey::RapidGrowth) {
        let delta = if oncologic_track { 0.15 } else { 0.07 };
        rules.apply(delta, "Rapid growth reported");
    }

    if context.is_set(SignalKey::Pain) {
        let delta = if oncologic_track { 0.05 } else { 0.03 };
        rules.apply(delta, "Pain reported");
    }

    if context.is_set(SignalKey::Itching) {
        match bucket {
            ConditionBucket::Oncologic | ConditionBucket::General => {
                rules.apply(0.03, "Itching reported")
            }
            ConditionBucket::Fungal | ConditionBucket::Inflammatory => {
                rules.apply(-0.03, "Itching reported")
            }
            ConditionBucket::Bacterial => {}
        }
    }

    if context.is_set(SignalKey::Scaling) {
        match bucket {
            ConditionBucket::Oncologic | ConditionBucket::General => {
                rules.apply(0.02, "Scaling reported")
            }
            ConditionBucket::Fungal | ConditionBucket::Inflammatory => {
                rules.apply(-0.05, "Scaling reported")
            }
            ConditionBucket::Bacterial => {}
        }
    }

    if context.is_set(SignalKey::RingShape) {
        rules.apply(-0.06, "Ring-shaped pattern reported");
    }

    if oncologic_track {
        if context.is_set(SignalKey::MultiColor) {
            rules.apply(0.08, "Multiple colors reported");
        }
        if context.is_set(SignalKey::IrregularBorder) {
            rules.apply(0.10, "Irregular border reported");
        }
        if context.is_set(SignalKey::NonHealing) {
            rules.apply(0.14, "Non-healing lesion reported");
        }
        if context.is_set(SignalKey::NewVsOldLesion) {
            rules.apply(0.07, "New or changed lesion reported");
        }
        if context.is_set(SignalKey::PreviousSkinCancer) {
            rules.apply(0.12, "Previous skin cancer reported");
        }
        match context.flag(SignalKey::FamilyHistorySkinCancer) {
            Some(true) => rules.apply(0.08, "Family history of skin cancer reported"),
            Some(false) => rules.apply(-0.02, "No family history of skin cancer"),
            None => {}
        }
        if context.is_set(SignalKey::SevereSunburnHistory) {
            rules.apply(0.06, "History of severe sunburns reported");
        }
        if context.is_set(SignalKey::Immunosuppression) {
            rules.apply(0.06, "Immunosuppression reported");
        }
    }

    if bucket == ConditionBucket::Fungal {
        if context.is_set(SignalKey::ContactHistory) {
            rules.apply(-0.03, "Contact with an affected person reported");
        }
        if context.is_set(SignalKey::PetExposure) {
            rules.apply(-0.03, "Pet exposure reported");
        }
        if context.is_set(SignalKey::SweatingOcclusion) {
            rules.apply(-0.02, "Sweating or occlusive clothing reported");
        }
        if context.is_set(SignalKey::SteroidCreamUse) {
            rules.apply(-0.02, "Steroid cream use reported");
        }
    }

    if bucket == ConditionBucket::Bacterial {
        if context.is_set(SignalKey::Fever) {
            rules.apply(0.02, "Fever reported");
        }
        if context.is_set(SignalKey::Pus) {
            rules.apply(0.02, "Pus or discharge reported");
        }
    }

    let (min, max) = if oncologic_track {
        (config.oncologic_min, config.oncologic_max)
    } else {
        (config.non_oncologic_min, config.non_oncologic_max)
    };
    let adjustment = rules.total.clamp(min, max);

    let mut score = clamp01(aggregate_score + adjustment);

    // Non-oncologic buckets can never reach "high" risk absent the two
    // strongest oncologic red flags together.
    if !oncologic_track
        && !(context.is_set(SignalKey::Bleeding) && context.is_set(SignalKey::RapidGrowth))
        && score > config.non_oncologic_ceiling
    {
        log::debug!(
            "ceiling applied for {} bucket: {:.3} -> {:.3}",
            bucket.as_str(),
            score,
            config.non_oncologic_ceiling
        );
        score = config.non_oncologic_ceiling;
    }

    AdjustmentResult {
        score,
        adjustment,
        contributing_factors: rules.factors,
        bucket,
    }
}

#[derive(Default)]
struct RuleLog {
    total: f64,
    factors: Vector<String>,
}

impl RuleLog {
    fn apply(&mut self, delta: f64, factor: &str) {
        self.total += delta;
        self.factors.push_back(factor.to_string());
    }
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

    fn config() -> AdjustmentConfig {
        AdjustmentConfig::default()
    }

    #[test]
    fn empty_context_means_no_adjustment() {
        let result = adjust(0.9, &derived(json!({})), ConditionBucket::Oncologic, &config());
        assert_eq!(result.adjustment, 0.0);
        assert_eq!(result.score, 0.9);
        assert!(result.contributing_factors.is_empty());
    }

    #[test]
    fn age_and_bleeding_add_up_for_oncologic() {
        let result = adjust(
            0.5,
            &derived(json!({"age": 70, "bleeding": true})),
            ConditionBucket::Oncologic,
            &config(),
        );
        assert!((result.adjustment - 0.17).abs() < 1e-9);
        assert!((result.score - 0.67).abs() < 1e-9);
        assert_eq!(
            result.contributing_factors,
            im::Vector::from(vec![
                "Age >= 65 reported".to_string(),
                "Bleeding reported".to_string(),
            ])
        );
    }

    #[test]
    fn age_does_not_move_non_oncologic_buckets() {
        let result = adjust(
            0.5,
            &derived(json!({"age": 70})),
            ConditionBucket::Fungal,
            &config(),
        );
        assert_eq!(result.adjustment, 0.0);
    }

    #[test]
    fn itching_and_scaling_flip_sign_for_fungal() {
        let result = adjust(
            0.5,
            &derived(json!({"itching": true, "scaling": true})),
            ConditionBucket::Fungal,
            &config(),
        );
        assert!((result.adjustment - (-0.08)).abs() < 1e-9);

        let result = adjust(
            0.5,
            &derived(json!({"itching": true, "scaling": true})),
            ConditionBucket::General,
            &config(),
        );
        assert!((result.adjustment - 0.05).abs() < 1e-9);
    }

    #[test]
    fn itching_and_scaling_do_not_move_bacterial() {
        let result = adjust(
            0.5,
            &derived(json!({"itching": true, "scaling": true})),
            ConditionBucket::Bacterial,
            &config(),
        );
        assert_eq!(result.adjustment, 0.0);
    }

    #[test]
    fn ring_shape_subtracts_for_every_bucket() {
        for bucket in ConditionBucket::ALL {
            let result = adjust(0.5, &derived(json!({"ring_shape": true})), bucket, &config());
            assert!((result.adjustment - (-0.06)).abs() < 1e-9, "{bucket}");
        }
    }

    #[test]
    fn oncologic_aggravators_are_gated_to_the_oncologic_track() {
        let context = derived(json!({"non_healing": true, "previous_skin_cancer": true}));
        let oncologic = adjust(0.3, &context, ConditionBucket::Oncologic, &config());
        assert!((oncologic.adjustment - 0.24).abs() < 1e-9); // 0.26 clamped

        let fungal = adjust(0.3, &context, ConditionBucket::Fungal, &config());
        assert_eq!(fungal.adjustment, 0.0);
    }

    #[test]
    fn explicit_no_family_history_subtracts_slightly() {
        let result = adjust(
            0.5,
            &derived(json!({"family_history_skin_cancer": false})),
            ConditionBucket::Oncologic,
            &config(),
        );
        assert!((result.adjustment - (-0.02)).abs() < 1e-9);
        assert_eq!(
            result.contributing_factors,
            im::Vector::from(vec!["No family history of skin cancer".to_string()])
        );
    }

    #[test]
    fn fungal_mitigators_subtract_only_for_fungal() {
        let context = derived(json!({
            "contact_history": true,
            "pet_exposure": true,
            "sweating_occlusion": true,
            "steroid_cream_use": true,
        }));
        let fungal = adjust(0.5, &context, ConditionBucket::Fungal, &config());
        assert!((fungal.adjustment - (-0.10)).abs() < 1e-9);

        let bacterial = adjust(0.5, &context, ConditionBucket::Bacterial, &config());
        assert_eq!(bacterial.adjustment, 0.0);
    }

    #[test]
    fn bacterial_aggravators_add_only_for_bacterial() {
        let context = derived(json!({"fever": true, "pus": true}));
        let bacterial = adjust(0.5, &context, ConditionBucket::Bacterial, &config());
        assert!((bacterial.adjustment - 0.04).abs() < 1e-9);

        let fungal = adjust(0.5, &context, ConditionBucket::Fungal, &config());
        assert_eq!(fungal.adjustment, 0.0);
    }

    #[test]
    fn adjustment_is_clamped_per_bucket() {
        let loaded = derived(json!({
            "bleeding": true,
            "rapid_growth": true,
            "non_healing": true,
            "previous_skin_cancer": true,
            "irregular_border": true,
            "multi_color": true,
        }));
        let oncologic = adjust(0.1, &loaded, ConditionBucket::Oncologic, &config());
        assert_eq!(oncologic.adjustment, 0.24);

        let mitigated = derived(json!({
            "ring_shape": true,
            "itching": true,
            "scaling": true,
            "contact_history": true,
            "pet_exposure": true,
            "sweating_occlusion": true,
            "steroid_cream_use": true,
        }));
        let fungal = adjust(0.5, &mitigated, ConditionBucket::Fungal, &config());
        assert_eq!(fungal.adjustment, -0.18);
    }

    #[test]
    fn non_oncologic_scores_are_capped_without_both_red_flags() {
        let result = adjust(
            0.9,
            &derived(json!({"bleeding": true})),
            ConditionBucket::Bacterial,
            &config(),
        );
        assert_eq!(result.score, 0.58);

        let result = adjust(
            0.9,
            &derived(json!({"bleeding": true, "rapid_growth": true})),
            ConditionBucket::Bacterial,
            &config(),
        );
        assert!(result.score > 0.58);
    }

    #[test]
    fn oncologic_scores_are_never_capped() {
        let result = adjust(0.9, &derived(json!({})), ConditionBucket::Oncologic, &config());
        assert_eq!(result.score, 0.9);
    }

    #[test]
    fn documented_fungal_example_lands_under_the_ceiling() {
        let context = derived(json!({
            "primary_concern": "fungal",
            "ring_shape": true,
            "itching": true,
        }));
        let result = adjust(0.6, &context, ConditionBucket::Fungal, &config());
        assert!((result.adjustment - (-0.09)).abs() < 1e-9);
        assert!(result.score <= 0.58);
    }
}
