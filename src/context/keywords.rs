//! Static keyword tables for free-text signal derivation
//!
//! Consulted by pure functions only; never mutated at request time.
//! Single-word entries are matched against the token set of the
//! normalized text, multi-word phrases by padded substring search.

use super::{PrimaryConcern, SignalKey};

/// Concern keywords per bucket name. The concern with the highest
/// distinct-keyword hit count wins; ties and zero hits mean no inference.
pub(crate) const CONCERN_KEYWORDS: &[(PrimaryConcern, &[&str])] = &[
    (
        PrimaryConcern::Cancer,
        &[
            "melanoma",
            "cancer",
            "skin cancer",
            "malignant",
            "changing mole",
            "mole changing",
        ],
    ),
    (
        PrimaryConcern::Fungal,
        &[
            "ringworm",
            "fungal",
            "fungus",
            "tinea",
            "athlete's foot",
            "jock itch",
        ],
    ),
    (
        PrimaryConcern::Bacterial,
        &[
            "infected",
            "infection",
            "abscess",
            "boil",
            "impetigo",
            "cellulitis",
        ],
    ),
    (
        PrimaryConcern::Inflammatory,
        &[
            "eczema",
            "dermatitis",
            "psoriasis",
            "allergic",
            "allergy",
            "hives",
        ],
    ),
];

/// One or more phrases per boolean signal key. A derived signal is set
/// true only when the key is absent from the explicit context.
pub(crate) const SIGNAL_KEYWORDS: &[(SignalKey, &[&str])] = &[
    (SignalKey::Bleeding, &["bleed", "bleeding", "bleeds", "blood"]),
    (SignalKey::Itching, &["itch", "itchy", "itching", "itches"]),
    (
        SignalKey::RapidGrowth,
        &[
            "growing fast",
            "grown quickly",
            "grew quickly",
            "getting bigger",
            "doubled in size",
            "changed size",
        ],
    ),
    (SignalKey::Pain, &["pain", "painful", "hurts", "tender"]),
    (
        SignalKey::Scaling,
        &["flaky", "scaly", "scaling", "peeling"],
    ),
    (
        SignalKey::RingShape,
        &["ring", "ring shaped", "circular", "round patch"],
    ),
    (
        SignalKey::MultiColor,
        &[
            "different colors",
            "multiple colors",
            "multicolored",
            "uneven color",
            "dark spots",
        ],
    ),
    (
        SignalKey::IrregularBorder,
        &["irregular border", "irregular edge", "jagged", "uneven edge"],
    ),
    (
        SignalKey::NonHealing,
        &[
            "won't heal",
            "wont heal",
            "not healing",
            "doesn't heal",
            "open sore",
        ],
    ),
    (
        SignalKey::NewVsOldLesion,
        &[
            "new mole",
            "new spot",
            "recently appeared",
            "old mole changed",
        ],
    ),
    (
        SignalKey::PreviousSkinCancer,
        &[
            "had skin cancer",
            "previous skin cancer",
            "skin cancer before",
        ],
    ),
    (
        SignalKey::FamilyHistorySkinCancer,
        &[
            "family history",
            "mother had",
            "father had",
            "runs in the family",
        ],
    ),
    (
        SignalKey::SevereSunburnHistory,
        &["sunburn", "sunburns", "sunburnt", "sunburned"],
    ),
    (
        SignalKey::Immunosuppression,
        &[
            "immunosuppressed",
            "immunosuppressant",
            "transplant",
            "chemotherapy",
            "weakened immune",
        ],
    ),
    (
        SignalKey::ContactHistory,
        &[
            "someone else has",
            "partner has",
            "family member has",
            "contact with someone",
        ],
    ),
    (
        SignalKey::PetExposure,
        &["cat", "cats", "dog", "dogs", "kitten", "puppy", "pet", "pets"],
    ),
    (
        SignalKey::SweatingOcclusion,
        &["sweat", "sweaty", "sweating", "tight clothing", "occlusive"],
    ),
    (
        SignalKey::SteroidCreamUse,
        &["steroid", "steroids", "hydrocortisone", "cortisone"],
    ),
    (SignalKey::Fever, &["fever", "feverish", "chills"]),
    (SignalKey::Pus, &["pus", "discharge", "oozing"]),
    (SignalKey::Swelling, &["swollen", "swelling"]),
    (
        SignalKey::Warmth,
        &["warm to the touch", "hot to the touch", "feels warm", "feels hot"],
    ),
    (
        SignalKey::RecurrentEpisodes,
        &[
            "flare",
            "flares",
            "flare up",
            "comes and goes",
            "keeps coming back",
            "recurrent",
        ],
    ),
    (
        SignalKey::AllergyHistory,
        &["allergies", "allergy", "allergic", "asthma", "hay fever"],
    ),
    (
        SignalKey::NewProductExposure,
        &[
            "new soap",
            "new detergent",
            "new cream",
            "new lotion",
            "new product",
        ],
    ),
    (
        SignalKey::Crusting,
        &["crust", "crusty", "crusted", "scab", "scabbing"],
    ),
];
