//! Condition bucket classification
//!
//! Two independent evidence sources (model label, patient context) are
//! scored and summed per bucket; the arg-max bucket wins, with ties broken
//! by enumeration order. A narrow override lets strongly contradicting
//! patient context beat a weak "suspicious" label. The override thresholds
//! are exact behavioral contracts, not tunables.

use crate::context::{DerivedContext, PrimaryConcern, SignalKey};
use crate::core::ConditionBucket;

/// Label substring evidence per bucket, strongest markers first.
const LABEL_EVIDENCE: &[(ConditionBucket, f64, &[&str])] = &[
    (ConditionBucket::Oncologic, 2.6, &["melan", "cancer", "carcinoma"]),
    (ConditionBucket::Fungal, 2.2, &["fung", "tinea", "ringworm"]),
    (ConditionBucket::Bacterial, 2.2, &["bacter", "impetigo", "follicul"]),
    (
        ConditionBucket::Inflammatory,
        2.0,
        &["rash", "eczema", "dermatitis", "inflamm"],
    ),
];

/// Weight of a bare "suspicious" label, the weak oncologic marker.
const WEAK_ONCOLOGIC_WEIGHT: f64 = 1.3;

/// Fallback weight when no label marker matches.
const UNMATCHED_LABEL_WEIGHT: f64 = 0.7;

/// Weight added to the bucket of a stated primary concern.
const CONCERN_WEIGHT: f64 = 2.8;

/// Weight an "unsure" concern adds to the general bucket.
const UNSURE_CONCERN_WEIGHT: f64 = 1.0;

/// Weight per strong-signal boolean set true in context.
const STRONG_SIGNAL_WEIGHT: f64 = 0.95;

/// Strong-signal boolean keys per bucket, decisive evidence in the vote.
const STRONG_SIGNALS: &[(ConditionBucket, &[SignalKey])] = &[
    (
        ConditionBucket::Oncologic,
        &[
            SignalKey::Bleeding,
            SignalKey::RapidGrowth,
            SignalKey::IrregularBorder,
            SignalKey::MultiColor,
            SignalKey::NonHealing,
            SignalKey::NewVsOldLesion,
            SignalKey::PreviousSkinCancer,
            SignalKey::FamilyHistorySkinCancer,
        ],
    ),
    (
        ConditionBucket::Fungal,
        &[
            SignalKey::RingShape,
            SignalKey::Itching,
            SignalKey::Scaling,
            SignalKey::ContactHistory,
            SignalKey::PetExposure,
            SignalKey::SweatingOcclusion,
        ],
    ),
    (
        ConditionBucket::Bacterial,
        &[
            SignalKey::Pain,
            SignalKey::Fever,
            SignalKey::Pus,
            SignalKey::Swelling,
            SignalKey::Warmth,
            SignalKey::Crusting,
        ],
    ),
    (
        ConditionBucket::Inflammatory,
        &[
            SignalKey::Itching,
            SignalKey::Scaling,
            SignalKey::RecurrentEpisodes,
            SignalKey::AllergyHistory,
            SignalKey::NewProductExposure,
        ],
    ),
    (ConditionBucket::General, &[]),
];

/// Score the model label against the per-bucket marker sets.
pub fn label_evidence(label: &str) -> (ConditionBucket, f64) {
    let lowered = label.to_lowercase();

    for (bucket, weight, markers) in LABEL_EVIDENCE {
        if markers.iter().any(|m| lowered.contains(m)) {
            return (*bucket, *weight);
        }
    }
    if lowered.contains("suspicious") {
        return (ConditionBucket::Oncologic, WEAK_ONCOLOGIC_WEIGHT);
    }
    (ConditionBucket::General, UNMATCHED_LABEL_WEIGHT)
}

/// Count of this bucket's strong-signal keys set true in context.
pub fn strong_signal_count(context: &DerivedContext, bucket: ConditionBucket) -> usize {
    STRONG_SIGNALS
        .iter()
        .find(|(b, _)| *b == bucket)
        .map(|(_, keys)| keys.iter().filter(|k| context.is_set(**k)).count())
        .unwrap_or(0)
}

/// Infer the condition bucket from label and derived context.
pub fn classify(label: &str, context: &DerivedContext) -> ConditionBucket {
    let (label_bucket, label_weight) = label_evidence(label);

    let mut totals = [0.0_f64; ConditionBucket::ALL.len()];
    totals[bucket_index(label_bucket)] += label_weight;

    if let Some(concern) = context.primary_concern() {
        let weight = if concern == PrimaryConcern::Unsure {
            UNSURE_CONCERN_WEIGHT
        } else {
            CONCERN_WEIGHT
        };
        totals[bucket_index(concern.bucket())] += weight;
    }

    for bucket in ConditionBucket::ALL {
        totals[bucket_index(bucket)] +=
            STRONG_SIGNAL_WEIGHT * strong_signal_count(context, bucket) as f64;
    }

    // Strict > keeps the earlier bucket on ties, matching enumeration order
    let mut winner = ConditionBucket::Oncologic;
    for bucket in ConditionBucket::ALL {
        if totals[bucket_index(bucket)] > totals[bucket_index(winner)] {
            winner = bucket;
        }
    }

    log::debug!(
        "bucket vote: oncologic={:.2} fungal={:.2} bacterial={:.2} inflammatory={:.2} general={:.2}",
        totals[0],
        totals[1],
        totals[2],
        totals[3],
        totals[4]
    );

    // Checked after the vote; swapping this order changes outcomes
    if fungal_override(label_bucket, label_weight, context) {
        log::debug!("fungal override fired over {} vote", winner.as_str());
        return ConditionBucket::Fungal;
    }

    winner
}

/// Patient-reported context beats an ambiguous low-confidence label when
/// strong contradicting clinical signals are present: explicit fungal
/// concern, at least two fungal strong-signals, only the weak oncologic
/// label marker, and at most one oncologic strong-signal.
fn fungal_override(
    label_bucket: ConditionBucket,
    label_weight: f64,
    context: &DerivedContext,
) -> bool {
    context.explicit_concern() == Some(PrimaryConcern::Fungal)
        && strong_signal_count(context, ConditionBucket::Fungal) >= 2
        && label_bucket == ConditionBucket::Oncologic
        && label_weight <= WEAK_ONCOLOGIC_WEIGHT
        && strong_signal_count(context, ConditionBucket::Oncologic) <= 1
}

fn bucket_index(bucket: ConditionBucket) -> usize {
    ConditionBucket::ALL
        .iter()
        .position(|b| *b == bucket)
        .expect("bucket present in ALL")
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

    #[test]
    fn label_markers_map_to_their_buckets() {
        assert_eq!(label_evidence("melanoma"), (ConditionBucket::Oncologic, 2.6));
        assert_eq!(label_evidence("Tinea_Corporis"), (ConditionBucket::Fungal, 2.2));
        assert_eq!(
            label_evidence("bacterial_folliculitis"),
            (ConditionBucket::Bacterial, 2.2)
        );
        assert_eq!(
            label_evidence("contact_dermatitis"),
            (ConditionBucket::Inflammatory, 2.0)
        );
        assert_eq!(
            label_evidence("suspicious_lesion"),
            (ConditionBucket::Oncologic, 1.3)
        );
        assert_eq!(label_evidence("nevus"), (ConditionBucket::General, 0.7));
    }

    #[test]
    fn strong_marker_beats_weak_suspicious_marker() {
        assert_eq!(
            label_evidence("suspicious_melanoma"),
            (ConditionBucket::Oncologic, 2.6)
        );
    }

    #[test]
    fn melanoma_label_with_empty_context_is_oncologic() {
        let context = derived(json!({}));
        assert_eq!(classify("melanoma", &context), ConditionBucket::Oncologic);
    }

    #[test]
    fn unmatched_label_with_empty_context_is_general() {
        let context = derived(json!({}));
        assert_eq!(classify("nevus", &context), ConditionBucket::General);
    }

    #[test]
    fn stated_concern_outweighs_an_unmatched_label() {
        let context = derived(json!({"primary_concern": "bacterial"}));
        assert_eq!(classify("nevus", &context), ConditionBucket::Bacterial);
    }

    #[test]
    fn unsure_concern_adds_only_a_small_general_vote() {
        // inflammatory label 2.0 beats general 0.7 + 1.0
        let context = derived(json!({"primary_concern": "unsure"}));
        assert_eq!(classify("eczema", &context), ConditionBucket::Inflammatory);
    }

    #[test]
    fn strong_signals_accumulate_per_bucket() {
        let context = derived(json!({
            "ring_shape": true,
            "itching": true,
            "scaling": true,
        }));
        // fungal 3 * 0.95 = 2.85 beats suspicious oncologic 1.3 and
        // inflammatory 2 * 0.95 = 1.9 (no override needed: no explicit concern)
        assert_eq!(
            classify("suspicious_lesion", &context),
            ConditionBucket::Fungal
        );
    }

    #[test]
    fn override_fires_on_the_documented_scenario() {
        let context = derived(json!({
            "primary_concern": "fungal",
            "ring_shape": true,
            "itching": true,
        }));
        assert_eq!(strong_signal_count(&context, ConditionBucket::Fungal), 2);
        assert_eq!(strong_signal_count(&context, ConditionBucket::Oncologic), 0);
        assert_eq!(
            classify("suspicious_lesion", &context),
            ConditionBucket::Fungal
        );
    }

    #[test]
    fn override_requires_an_explicit_concern() {
        // same signals but the concern only comes from free text
        let context = derived(json!({
            "ring_shape": true,
            "itching": true,
            "context_text": "I think it is ringworm, maybe tinea."
        }));
        assert!(context.explicit_concern().is_none());
        // vote still lands on fungal through signal weight alone
        assert_eq!(
            classify("suspicious_lesion", &context),
            ConditionBucket::Fungal
        );
    }

    #[test]
    fn override_does_not_fire_against_a_strong_oncologic_label() {
        let context = derived(json!({
            "primary_concern": "fungal",
            "ring_shape": true,
            "itching": true,
            "scaling": true,
        }));
        // melanoma 2.6 + no oncologic signals vs fungal 2.8 + 2.85: the
        // vote itself picks fungal, but the override must stay silent
        let (bucket, weight) = label_evidence("melanoma");
        assert!(!fungal_override(bucket, weight, &context));
    }

    #[test]
    fn override_does_not_fire_with_two_oncologic_signals() {
        let context = derived(json!({
            "primary_concern": "fungal",
            "ring_shape": true,
            "itching": true,
            "bleeding": true,
            "rapid_growth": true,
        }));
        let (bucket, weight) = label_evidence("suspicious_lesion");
        assert!(!fungal_override(bucket, weight, &context));
    }

    #[test]
    fn tie_breaks_by_enumeration_order() {
        // fungal and bacterial label weights are both 2.2; craft a tie
        // between bacterial and inflammatory via signals instead
        let context = derived(json!({
            "fever": true,
            "recurrent_episodes": true,
        }));
        // bacterial 0.95 vs inflammatory 0.95, label unmatched general 0.7:
        // bacterial wins the tie by enumeration order
        assert_eq!(classify("nevus", &context), ConditionBucket::Bacterial);
    }
}
