//! Verdict classification from a risk score and anomaly labels
//!
//! Threshold table (defaults, configurable under `[policy]`):
//!
//! | score      | tier     |
//! |------------|----------|
//! | `>= 90`    | CRITICAL |
//! | `>= 50`    | ELEVATED |
//! | otherwise  | LOW      |
//!
//! Any non-blank anomaly label escalates the tier by one step, saturating
//! at CRITICAL. Scores are rounded and clamped to `0..=100`.

use serde::{Deserialize, Serialize};

use crate::analysis::{Recommendation, RiskLevel};
use crate::config::PolicyConfig;

pub const MAX_SCORE: u8 = 100;

/// Judgment input
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JudgmentRequest {
    pub risk_score: f64,
    #[serde(default)]
    pub anomalies: Vec<String>,
}

/// Classifier verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub verdict: RiskLevel,
    pub risk_score: u8,
    pub anomalies: Vec<String>,
    /// Whether anomalies raised the tier above the score-only tier
    pub escalated: bool,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgmentPolicy {
    pub critical_threshold: u8,
    pub elevated_threshold: u8,
}

impl Default for JudgmentPolicy {
    fn default() -> Self {
        Self::from_policy(&PolicyConfig::default())
    }
}

impl JudgmentPolicy {
    pub fn from_policy(policy: &PolicyConfig) -> Self {
        Self {
            critical_threshold: policy.critical_threshold,
            elevated_threshold: policy.elevated_threshold,
        }
    }

    /// Tier from the score alone
    pub fn tier(&self, score: u8) -> RiskLevel {
        if score >= self.critical_threshold {
            RiskLevel::Critical
        } else if score >= self.elevated_threshold {
            RiskLevel::Elevated
        } else {
            RiskLevel::Low
        }
    }

    pub fn evaluate(&self, risk_score: f64, anomalies: &[String]) -> Verdict {
        let score = risk_score.clamp(0.0, f64::from(MAX_SCORE)).round() as u8;
        let anomalies: Vec<String> = anomalies
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();

        let base = self.tier(score);
        let verdict = if anomalies.is_empty() {
            base
        } else {
            base.escalate()
        };

        tracing::info!(
            risk_score = score,
            anomaly_count = anomalies.len(),
            base_tier = %base,
            verdict = %verdict,
            "Judgment issued"
        );

        Verdict {
            verdict,
            risk_score: score,
            escalated: verdict != base,
            recommendation: recommendation_for(verdict),
            anomalies,
        }
    }
}

pub fn recommendation_for(level: RiskLevel) -> Recommendation {
    match level {
        RiskLevel::Critical => Recommendation::ImmediateLockdown,
        RiskLevel::Elevated => Recommendation::StepUpVerification,
        RiskLevel::Low => Recommendation::Allow,
    }
}
