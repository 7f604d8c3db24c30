//! Rule-based login risk analysis
//!
//! A login is CRITICAL when it comes from a restricted location or from a
//! blocked subnet prefix, and LOW otherwise. No other signal is considered.

use serde::{Deserialize, Serialize};

use crate::account::UserId;
use crate::config::PolicyConfig;

/// Score attached to a CRITICAL assessment
pub const CRITICAL_SCORE: u8 = 95;

/// Score attached to a LOW assessment
pub const LOW_SCORE: u8 = 10;

pub const GEO_FENCING_REASON: &str = "Geo-fencing violation (Restricted Country)";

/// Risk tier shared by analysis and judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Elevated,
    Critical,
}

impl RiskLevel {
    /// Next tier up, saturating at CRITICAL
    pub fn escalate(self) -> Self {
        match self {
            Self::Low => Self::Elevated,
            Self::Elevated | Self::Critical => Self::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Elevated => "ELEVATED",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended follow-up action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    ImmediateLockdown,
    StepUpVerification,
    Allow,
}

/// A login event to score
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginEvent {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub user_id: String,
}

/// Outcome of a risk analysis
///
/// Serializes to
/// `{"risk_score": 95, "risk_level": "CRITICAL", "reason": ..., "recommendation": "IMMEDIATE_LOCKDOWN"}`
/// or `{"risk_score": 10, "risk_level": "LOW", "status": "Safe"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RiskAssessment {
    pub fn critical() -> Self {
        Self {
            risk_score: CRITICAL_SCORE,
            risk_level: RiskLevel::Critical,
            reason: Some(GEO_FENCING_REASON.to_string()),
            recommendation: Some(Recommendation::ImmediateLockdown),
            status: None,
        }
    }

    pub fn low() -> Self {
        Self {
            risk_score: LOW_SCORE,
            risk_level: RiskLevel::Low,
            reason: None,
            recommendation: None,
            status: Some("Safe".to_string()),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.risk_level == RiskLevel::Critical
    }
}

/// Scores login events against the restricted-location and blocked-prefix lists
#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    restricted_countries: Vec<String>,
    blocked_ip_prefixes: Vec<String>,
}

impl Default for RiskAnalyzer {
    fn default() -> Self {
        Self::from_policy(&PolicyConfig::default())
    }
}

impl RiskAnalyzer {
    /// Build an analyzer; locations are matched lowercased and trimmed
    pub fn new(
        restricted_countries: impl IntoIterator<Item = impl AsRef<str>>,
        blocked_ip_prefixes: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            restricted_countries: restricted_countries
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
            // an empty prefix would match every address
            blocked_ip_prefixes: blocked_ip_prefixes
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_policy(policy: &PolicyConfig) -> Self {
        Self::new(&policy.restricted_countries, &policy.blocked_ip_prefixes)
    }

    pub fn is_restricted_location(&self, location: &str) -> bool {
        let location = location.trim().to_lowercase();
        self.restricted_countries.iter().any(|c| *c == location)
    }

    pub fn is_blocked_ip(&self, ip_address: &str) -> bool {
        let ip_address = ip_address.trim();
        self.blocked_ip_prefixes
            .iter()
            .any(|prefix| ip_address.starts_with(prefix.as_str()))
    }

    /// Score a login. Malformed or empty fields fall through to LOW.
    pub fn analyze(&self, ip_address: &str, location: &str, user_id: &UserId) -> RiskAssessment {
        let restricted = self.is_restricted_location(location);
        let blocked = self.is_blocked_ip(ip_address);

        let assessment = if restricted || blocked {
            RiskAssessment::critical()
        } else {
            RiskAssessment::low()
        };

        tracing::info!(
            user_id = %user_id,
            location = location,
            ip_address = ip_address,
            restricted_location = restricted,
            blocked_ip = blocked,
            risk_level = %assessment.risk_level,
            "Login analyzed"
        );

        assessment
    }

    pub fn analyze_event(&self, event: &LoginEvent) -> RiskAssessment {
        self.analyze(
            &event.ip_address,
            &event.location,
            &UserId::new(&event.user_id),
        )
    }
}
