//! Multi-image score aggregation
//!
//! Pure, order-independent combination of per-image model scores into a
//! single aggregate with a consistency verdict. The weighting is
//! cancer-averse: the most alarming image dominates, the mean damps
//! single-image over-confidence.

use crate::config::AggregationConfig;
use crate::core::{clamp01, AggregationResult};
use crate::errors::EngineError;

/// Combine per-image scores into one aggregate score.
///
/// Each score is clamped to [0, 1] first. With a single score the
/// aggregate is that score; otherwise `max_weight*max + avg_weight*avg`.
/// `is_inconsistent` is set when the spread between the highest and lowest
/// clamped score exceeds the disagreement threshold.
pub fn aggregate(scores: &[f64], config: &AggregationConfig) -> Result<AggregationResult, EngineError> {
    if scores.is_empty() {
        return Err(EngineError::NoObservations);
    }

    let normalized: Vec<f64> = scores.iter().copied().map(clamp01).collect();
    let max_score = normalized.iter().copied().fold(f64::MIN, f64::max);
    let min_score = normalized.iter().copied().fold(f64::MAX, f64::min);
    let avg_score = normalized.iter().sum::<f64>() / normalized.len() as f64;
    let spread = max_score - min_score;

    let aggregate_score = if normalized.len() == 1 {
        normalized[0]
    } else {
        clamp01(config.max_weight * max_score + config.avg_weight * avg_score)
    };

    let is_inconsistent = spread > config.disagreement_threshold;
    if is_inconsistent {
        log::debug!(
            "consistency gate tripped: spread {:.3} > threshold {:.3}",
            spread,
            config.disagreement_threshold
        );
    }

    Ok(AggregationResult {
        aggregate_score,
        max_score,
        avg_score,
        spread,
        is_inconsistent,
    })
}
