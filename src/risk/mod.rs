//! Risk tier mapping and user-facing messaging

pub mod confidence;

use crate::core::RiskTier;
use serde::{Deserialize, Serialize};

/// Scores at or above this are "high" risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.75;

/// Scores at or above this (and below high) are "medium" risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// Map a final score to its risk tier.
pub fn map_risk_tier(score: f64) -> RiskTier {
    if score >= HIGH_RISK_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Tier with its fixed user-facing message and recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMessaging {
    pub tier: RiskTier,
    pub message: String,
    pub recommendation: String,
}

/// Build the fixed message and recommendation for a final score.
pub fn build_risk_messaging(score: f64) -> RiskMessaging {
    match map_risk_tier(score) {
        RiskTier::Low => RiskMessaging {
            tier: RiskTier::Low,
            message: "Low Risk - Monitor regularly.".to_string(),
            recommendation:
                "Capture a new image if the lesion changes in color, shape, or size.".to_string(),
        },
        RiskTier::Medium => RiskMessaging {
            tier: RiskTier::Medium,
            message: "Medium Risk - Dermatologist consultation recommended.".to_string(),
            recommendation:
                "Schedule a dermatology appointment for professional evaluation.".to_string(),
        },
        RiskTier::High => RiskMessaging {
            tier: RiskTier::High,
            message: "High Risk - Immediate clinical evaluation advised.".to_string(),
            recommendation: "Seek prompt in-person medical assessment.".to_string(),
        },
    }
}
