//! Follow-up question selection
//!
//! Ranks the bucket's unanswered catalog questions by clinical priority
//! for the decided risk tier. Selection is a read-only lookup over the
//! static catalog; nothing is mutated at request time.

mod catalog;

pub use catalog::{catalog, CatalogEntry};

use crate::config::FollowupConfig;
use crate::context::DerivedContext;
use crate::core::{ConditionBucket, FollowupQuestion, RiskTier};
use im::Vector;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Bucket-specific keys asked first.
const HIGH_PRIORITY: &[(ConditionBucket, &[&str])] = &[
    (
        ConditionBucket::Oncologic,
        &[
            "previous_skin_cancer",
            "family_history_skin_cancer",
            "non_healing",
            "new_vs_old_lesion",
            "immunosuppression",
        ],
    ),
    (ConditionBucket::Fungal, &["ring_shape", "itching"]),
    (ConditionBucket::Bacterial, &["fever", "pus"]),
    (
        ConditionBucket::Inflammatory,
        &["recurrent_episodes", "allergy_history"],
    ),
    (ConditionBucket::General, &["rapid_growth", "bleeding"]),
];

/// Bucket-specific keys asked next.
const MEDIUM_PRIORITY: &[(ConditionBucket, &[&str])] = &[
    (ConditionBucket::Oncologic, &["severe_sunburn_history"]),
    (ConditionBucket::Fungal, &["scaling", "duration_days"]),
    (ConditionBucket::Bacterial, &["pain", "duration_days"]),
    (ConditionBucket::Inflammatory, &["itching", "duration_days"]),
    (ConditionBucket::General, &["duration_days", "pain"]),
];

/// Select the unanswered clarifying questions for a decision, highest
/// priority first, capped at the configured maximum.
///
/// A key counts as answered when it is present in the derived context or
/// in the caller's follow-up answers.
pub fn select(
    bucket: ConditionBucket,
    context: &DerivedContext,
    answered_keys: &BTreeSet<String>,
    tier: RiskTier,
    config: &FollowupConfig,
) -> Vector<FollowupQuestion> {
    let mut candidates: Vec<(i32, &CatalogEntry)> = catalog(bucket)
        .iter()
        .filter(|entry| !context.answered(entry.key) && !answered_keys.contains(entry.key))
        .map(|entry| (priority(bucket, entry.key, tier), entry))
        .collect();

    // Stable sort keeps catalog order on ties
    candidates.sort_by_key(|(priority, _)| Reverse(*priority));

    candidates
        .into_iter()
        .take(config.max_questions)
        .map(|(_, entry)| FollowupQuestion {
            key: entry.key.to_string(),
            question: entry.question.to_string(),
        })
        .collect()
}

fn priority(bucket: ConditionBucket, key: &str, tier: RiskTier) -> i32 {
    let mut priority = if in_set(HIGH_PRIORITY, bucket, key) {
        if tier == RiskTier::High {
            6
        } else {
            4
        }
    } else if in_set(MEDIUM_PRIORITY, bucket, key) {
        if tier == RiskTier::High {
            4
        } else {
            2
        }
    } else {
        2
    };

    // Family history stays relevant outside its native oncologic bucket
    // at elevated risk, and drops away at low risk
    if key == "family_history_skin_cancer" && bucket != ConditionBucket::Oncologic {
        priority += if tier == RiskTier::Low { -2 } else { 1 };
    }

    if key == "non_healing" && tier == RiskTier::High {
        priority += 2;
    }

    priority
}

fn in_set(table: &[(ConditionBucket, &[&str])], bucket: ConditionBucket, key: &str) -> bool {
    table
        .iter()
        .find(|(b, _)| *b == bucket)
        .map(|(_, keys)| keys.contains(&key))
        .unwrap_or(false)
}
