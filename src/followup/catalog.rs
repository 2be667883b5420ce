//! Static follow-up question catalog
//!
//! Six entries per bucket, initialized once and never mutated at request
//! time. Catalog order is the tie-break order of the selector.

use crate::core::ConditionBucket;

/// One static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub question: &'static str,
}

const ONCOLOGIC: &[CatalogEntry] = &[
    CatalogEntry {
        key: "previous_skin_cancer",
        question: "Have you ever been diagnosed with skin cancer?",
    },
    CatalogEntry {
        key: "family_history_skin_cancer",
        question: "Has a close family member had skin cancer?",
    },
    CatalogEntry {
        key: "non_healing",
        question: "Is this a sore that does not heal?",
    },
    CatalogEntry {
        key: "new_vs_old_lesion",
        question: "Is this a new lesion, or has an existing one changed?",
    },
    CatalogEntry {
        key: "immunosuppression",
        question: "Do you have a weakened immune system or take immunosuppressant medication?",
    },
    CatalogEntry {
        key: "severe_sunburn_history",
        question: "Have you had severe or blistering sunburns in the past?",
    },
];

const FUNGAL: &[CatalogEntry] = &[
    CatalogEntry {
        key: "duration_days",
        question: "How many days has this lesion been present?",
    },
    CatalogEntry {
        key: "itching",
        question: "Is there persistent itching?",
    },
    CatalogEntry {
        key: "ring_shape",
        question: "Does the patch have a ring-like shape with central clearing?",
    },
    CatalogEntry {
        key: "scaling",
        question: "Is the skin flaky or scaling?",
    },
    CatalogEntry {
        key: "pet_exposure",
        question: "Have you been in contact with pets or farm animals?",
    },
    CatalogEntry {
        key: "sweating_occlusion",
        question: "Is the area often sweaty or covered by tight clothing?",
    },
];

const BACTERIAL: &[CatalogEntry] = &[
    CatalogEntry {
        key: "duration_days",
        question: "How many days has this lesion been present?",
    },
    CatalogEntry {
        key: "pain",
        question: "Is there pain or tenderness?",
    },
    CatalogEntry {
        key: "fever",
        question: "Do you have a fever or feel generally unwell?",
    },
    CatalogEntry {
        key: "pus",
        question: "Is there pus or discharge?",
    },
    CatalogEntry {
        key: "swelling",
        question: "Is the surrounding skin swollen?",
    },
    CatalogEntry {
        key: "warmth",
        question: "Does the area feel warm to the touch?",
    },
];

const INFLAMMATORY: &[CatalogEntry] = &[
    CatalogEntry {
        key: "duration_days",
        question: "How many days has this lesion been present?",
    },
    CatalogEntry {
        key: "itching",
        question: "Is there persistent itching?",
    },
    CatalogEntry {
        key: "recurrent_episodes",
        question: "Have you had similar flare-ups before?",
    },
    CatalogEntry {
        key: "allergy_history",
        question: "Do you have known allergies, asthma, or hay fever?",
    },
    CatalogEntry {
        key: "new_product_exposure",
        question: "Have you started using any new soaps, detergents, or skin products?",
    },
    CatalogEntry {
        key: "scaling",
        question: "Is the skin flaky or scaling?",
    },
];

const GENERAL: &[CatalogEntry] = &[
    CatalogEntry {
        key: "duration_days",
        question: "How many days has this lesion been present?",
    },
    CatalogEntry {
        key: "rapid_growth",
        question: "Has the lesion changed size recently?",
    },
    CatalogEntry {
        key: "bleeding",
        question: "Is there bleeding?",
    },
    CatalogEntry {
        key: "pain",
        question: "Is there pain or tenderness?",
    },
    CatalogEntry {
        key: "itching",
        question: "Is there persistent itching?",
    },
    CatalogEntry {
        key: "family_history_skin_cancer",
        question: "Has a close family member had skin cancer?",
    },
];

/// The fixed 6-entry catalog for a bucket, in tie-break order.
pub fn catalog(bucket: ConditionBucket) -> &'static [CatalogEntry] {
    match bucket {
        ConditionBucket::Oncologic => ONCOLOGIC,
        ConditionBucket::Fungal => FUNGAL,
        ConditionBucket::Bacterial => BACTERIAL,
        ConditionBucket::Inflammatory => INFLAMMATORY,
        ConditionBucket::General => GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bucket_has_exactly_six_entries() {
        for bucket in ConditionBucket::ALL {
            assert_eq!(catalog(bucket).len(), 6, "{bucket}");
        }
    }

    #[test]
    fn catalog_keys_are_unique_within_a_bucket() {
        for bucket in ConditionBucket::ALL {
            let entries = catalog(bucket);
            let mut keys: Vec<&str> = entries.iter().map(|e| e.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), entries.len(), "{bucket}");
        }
    }
}
