//! Patient context normalization
//!
//! Validates the caller-supplied context mapping into a strictly-typed
//! record (unknown keys ignored, known keys strictly typed), then derives
//! additional signals from free text by keyword matching. Explicit answers
//! always take precedence over derived ones.

mod keywords;

use crate::core::ConditionBucket;
use crate::errors::EngineError;
use keywords::{CONCERN_KEYWORDS, SIGNAL_KEYWORDS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Raw context as supplied by the caller: arbitrary keys, arbitrary values.
pub type RawContext = serde_json::Map<String, serde_json::Value>;

/// Maximum retained length of the free-text field, in characters.
pub const MAX_CONTEXT_TEXT_CHARS: usize = 1500;

const MAX_AGE: u64 = 120;
const MAX_DURATION_DAYS: u64 = 36500;

/// Recognized boolean context keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKey {
    Bleeding,
    Itching,
    RapidGrowth,
    Pain,
    Scaling,
    RingShape,
    MultiColor,
    IrregularBorder,
    NonHealing,
    NewVsOldLesion,
    PreviousSkinCancer,
    FamilyHistorySkinCancer,
    SevereSunburnHistory,
    Immunosuppression,
    ContactHistory,
    PetExposure,
    SweatingOcclusion,
    SteroidCreamUse,
    Fever,
    Pus,
    Swelling,
    Warmth,
    RecurrentEpisodes,
    AllergyHistory,
    NewProductExposure,
    Crusting,
}

impl SignalKey {
    /// All recognized boolean keys.
    pub const ALL: [SignalKey; 26] = [
        SignalKey::Bleeding,
        SignalKey::Itching,
        SignalKey::RapidGrowth,
        SignalKey::Pain,
        SignalKey::Scaling,
        SignalKey::RingShape,
        SignalKey::MultiColor,
        SignalKey::IrregularBorder,
        SignalKey::NonHealing,
        SignalKey::NewVsOldLesion,
        SignalKey::PreviousSkinCancer,
        SignalKey::FamilyHistorySkinCancer,
        SignalKey::SevereSunburnHistory,
        SignalKey::Immunosuppression,
        SignalKey::ContactHistory,
        SignalKey::PetExposure,
        SignalKey::SweatingOcclusion,
        SignalKey::SteroidCreamUse,
        SignalKey::Fever,
        SignalKey::Pus,
        SignalKey::Swelling,
        SignalKey::Warmth,
        SignalKey::RecurrentEpisodes,
        SignalKey::AllergyHistory,
        SignalKey::NewProductExposure,
        SignalKey::Crusting,
    ];

    /// Wire key name for this signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKey::Bleeding => "bleeding",
            SignalKey::Itching => "itching",
            SignalKey::RapidGrowth => "rapid_growth",
            SignalKey::Pain => "pain",
            SignalKey::Scaling => "scaling",
            SignalKey::RingShape => "ring_shape",
            SignalKey::MultiColor => "multi_color",
            SignalKey::IrregularBorder => "irregular_border",
            SignalKey::NonHealing => "non_healing",
            SignalKey::NewVsOldLesion => "new_vs_old_lesion",
            SignalKey::PreviousSkinCancer => "previous_skin_cancer",
            SignalKey::FamilyHistorySkinCancer => "family_history_skin_cancer",
            SignalKey::SevereSunburnHistory => "severe_sunburn_history",
            SignalKey::Immunosuppression => "immunosuppression",
            SignalKey::ContactHistory => "contact_history",
            SignalKey::PetExposure => "pet_exposure",
            SignalKey::SweatingOcclusion => "sweating_occlusion",
            SignalKey::SteroidCreamUse => "steroid_cream_use",
            SignalKey::Fever => "fever",
            SignalKey::Pus => "pus",
            SignalKey::Swelling => "swelling",
            SignalKey::Warmth => "warmth",
            SignalKey::RecurrentEpisodes => "recurrent_episodes",
            SignalKey::AllergyHistory => "allergy_history",
            SignalKey::NewProductExposure => "new_product_exposure",
            SignalKey::Crusting => "crusting",
        }
    }

    /// Look up a recognized boolean key by wire name.
    pub fn from_key(key: &str) -> Option<SignalKey> {
        SignalKey::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

/// The caller's stated primary concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryConcern {
    Cancer,
    Fungal,
    Bacterial,
    Inflammatory,
    Unsure,
}

impl PrimaryConcern {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryConcern::Cancer => "cancer",
            PrimaryConcern::Fungal => "fungal",
            PrimaryConcern::Bacterial => "bacterial",
            PrimaryConcern::Inflammatory => "inflammatory",
            PrimaryConcern::Unsure => "unsure",
        }
    }

    fn parse(value: &str) -> Option<PrimaryConcern> {
        match value {
            "cancer" => Some(PrimaryConcern::Cancer),
            "fungal" => Some(PrimaryConcern::Fungal),
            "bacterial" => Some(PrimaryConcern::Bacterial),
            "inflammatory" => Some(PrimaryConcern::Inflammatory),
            "unsure" => Some(PrimaryConcern::Unsure),
            _ => None,
        }
    }

    /// Bucket this concern votes for.
    pub fn bucket(&self) -> ConditionBucket {
        match self {
            PrimaryConcern::Cancer => ConditionBucket::Oncologic,
            PrimaryConcern::Fungal => ConditionBucket::Fungal,
            PrimaryConcern::Bacterial => ConditionBucket::Bacterial,
            PrimaryConcern::Inflammatory => ConditionBucket::Inflammatory,
            PrimaryConcern::Unsure => ConditionBucket::General,
        }
    }
}

/// Normalized context restricted to the fixed key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Explicitly answered boolean signals (true and false both carried)
    pub flags: BTreeMap<SignalKey, bool>,
    pub age: Option<u32>,
    pub duration_days: Option<u32>,
    pub context_text: Option<String>,
    pub primary_concern: Option<PrimaryConcern>,
}

impl Context {
    /// Whether a signal was answered true.
    pub fn is_set(&self, key: SignalKey) -> bool {
        self.flags.get(&key) == Some(&true)
    }

    /// The answered value of a signal, if any.
    pub fn flag(&self, key: SignalKey) -> Option<bool> {
        self.flags.get(&key).copied()
    }

    /// Whether a context field is present at all, by wire name.
    pub fn answered(&self, key: &str) -> bool {
        match key {
            "age" => self.age.is_some(),
            "duration_days" => self.duration_days.is_some(),
            "context_text" => self.context_text.is_some(),
            "primary_concern" => self.primary_concern.is_some(),
            _ => SignalKey::from_key(key)
                .map(|k| self.flags.contains_key(&k))
                .unwrap_or(false),
        }
    }
}

/// Context plus signals inferred from free text.
///
/// Tracks which keys were inferred so downstream rules can distinguish
/// explicit answers from text-derived ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedContext {
    context: Context,
    inferred_signals: BTreeSet<SignalKey>,
    concern_inferred: bool,
}

impl DerivedContext {
    /// The merged context (explicit answers plus derived signals).
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn is_set(&self, key: SignalKey) -> bool {
        self.context.is_set(key)
    }

    pub fn flag(&self, key: SignalKey) -> Option<bool> {
        self.context.flag(key)
    }

    pub fn answered(&self, key: &str) -> bool {
        self.context.answered(key)
    }

    pub fn age(&self) -> Option<u32> {
        self.context.age
    }

    pub fn duration_days(&self) -> Option<u32> {
        self.context.duration_days
    }

    pub fn primary_concern(&self) -> Option<PrimaryConcern> {
        self.context.primary_concern
    }

    /// The primary concern only when the caller stated it explicitly.
    pub fn explicit_concern(&self) -> Option<PrimaryConcern> {
        if self.concern_inferred {
            None
        } else {
            self.context.primary_concern
        }
    }

    /// Whether a signal was inferred from text rather than answered.
    pub fn was_inferred(&self, key: SignalKey) -> bool {
        self.inferred_signals.contains(&key)
    }
}

/// Validate raw caller context into the fixed-key [`Context`].
///
/// Unknown keys are silently ignored; any recognized key whose value fails
/// its type or range check is rejected with the offending key name.
pub fn validate(raw: Option<&RawContext>) -> Result<Context, EngineError> {
    let Some(raw) = raw else {
        return Ok(Context::default());
    };

    let mut context = Context::default();

    for (key, value) in raw {
        if let Some(signal) = SignalKey::from_key(key) {
            match value.as_bool() {
                Some(flag) => {
                    context.flags.insert(signal, flag);
                }
                None => return Err(EngineError::invalid_context(key, "must be boolean")),
            }
            continue;
        }

        match key.as_str() {
            "age" => {
                let age = value
                    .as_u64()
                    .filter(|v| *v <= MAX_AGE)
                    .ok_or_else(|| {
                        EngineError::invalid_context(
                            "age",
                            "must be an integer between 0 and 120",
                        )
                    })?;
                context.age = Some(age as u32);
            }
            "duration_days" => {
                let duration = value
                    .as_u64()
                    .filter(|v| *v <= MAX_DURATION_DAYS)
                    .ok_or_else(|| {
                        EngineError::invalid_context(
                            "duration_days",
                            "must be an integer between 0 and 36500",
                        )
                    })?;
                context.duration_days = Some(duration as u32);
            }
            "context_text" => {
                let text = value.as_str().ok_or_else(|| {
                    EngineError::invalid_context("context_text", "must be a string")
                })?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    context.context_text = Some(cap_chars(trimmed, MAX_CONTEXT_TEXT_CHARS));
                }
            }
            "primary_concern" => {
                let concern = value.as_str().and_then(PrimaryConcern::parse).ok_or_else(
                    || {
                        EngineError::invalid_context(
                            "primary_concern",
                            "must be one of cancer, fungal, bacterial, inflammatory, unsure",
                        )
                    },
                )?;
                context.primary_concern = Some(concern);
            }
            // Unknown keys dropped for forward-compatible ingestion
            _ => {}
        }
    }

    Ok(context)
}

/// Derive additional signals from `context_text` keyword matches.
///
/// A derived signal is added only when its key is absent from the explicit
/// context; the concern is inferred only when none was stated and exactly
/// one concern has the highest keyword hit count.
pub fn derive(context: Context) -> DerivedContext {
    let Some(text) = context.context_text.clone() else {
        return DerivedContext {
            context,
            ..DerivedContext::default()
        };
    };

    let normalized = normalize_text(&text);
    let words: BTreeSet<&str> = normalized.split(' ').collect();

    let mut derived = DerivedContext {
        context,
        ..DerivedContext::default()
    };

    if derived.context.primary_concern.is_none() {
        if let Some(concern) = infer_concern(&normalized, &words) {
            log::debug!("inferred primary_concern={} from context text", concern.as_str());
            derived.context.primary_concern = Some(concern);
            derived.concern_inferred = true;
        }
    }

    for (key, phrases) in SIGNAL_KEYWORDS {
        if derived.context.flags.contains_key(key) {
            continue;
        }
        if phrases.iter().any(|p| phrase_present(&normalized, &words, p)) {
            log::debug!("inferred {}=true from context text", key.as_str());
            derived.context.flags.insert(*key, true);
            derived.inferred_signals.insert(*key);
        }
    }

    derived
}

static NON_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9'\s]+").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercase, strip punctuation, collapse whitespace.
fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_TEXT.replace_all(&lowered, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Single words match against the token set; multi-word phrases by padded
/// substring search so they never match inside a larger word.
fn phrase_present(normalized: &str, words: &BTreeSet<&str>, phrase: &str) -> bool {
    if phrase.contains(' ') {
        format!(" {normalized} ").contains(&format!(" {phrase} "))
    } else {
        words.contains(phrase)
    }
}

fn infer_concern(normalized: &str, words: &BTreeSet<&str>) -> Option<PrimaryConcern> {
    let mut best: Option<(PrimaryConcern, usize)> = None;
    let mut tied = false;

    for (concern, phrases) in CONCERN_KEYWORDS {
        let hits = phrases
            .iter()
            .filter(|p| phrase_present(normalized, words, p))
            .count();
        if hits == 0 {
            continue;
        }
        match best {
            Some((_, top)) if hits == top => tied = true,
            Some((_, top)) if hits > top => {
                best = Some((*concern, hits));
                tied = false;
            }
            None => best = Some((*concern, hits)),
            _ => {}
        }
    }

    match (best, tied) {
        (Some((concern, _)), false) => Some(concern),
        _ => None,
    }
}

fn cap_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
