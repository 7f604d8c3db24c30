//! Account lockdown
//!
//! Enforcement is the only operation that mutates the account store. A miss
//! is reported in the result payload, never as an HTTP error.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountStore, LockTransition, UserId};
use crate::analysis::RiskLevel;
use crate::ids::AuditTicket;

/// Result of an enforcement attempt
///
/// Serialized with a `status` tag: `SUCCESS`, `ERROR` or `NO_ACTION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnforcementOutcome {
    Success {
        action_taken: String,
        audit_ticket: AuditTicket,
        timestamp: String,
    },
    Error {
        message: String,
    },
    NoAction {
        message: String,
    },
}

impl EnforcementOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The wire value of the `status` tag
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "SUCCESS",
            Self::Error { .. } => "ERROR",
            Self::NoAction { .. } => "NO_ACTION",
        }
    }
}

/// Body of `POST /lockdown`
#[derive(Debug, Clone, Deserialize)]
pub struct LockdownRequest {
    pub user_id: String,
    pub reason: String,
}

/// Body of `POST /enforcer/execute`
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    pub user_id: String,
    pub verdict: String,
}

/// Parse a verdict label as produced by the judgment stage
pub fn parse_verdict(raw: &str) -> Option<RiskLevel> {
    match raw.trim().to_uppercase().as_str() {
        "CRITICAL" => Some(RiskLevel::Critical),
        "ELEVATED" => Some(RiskLevel::Elevated),
        "LOW" => Some(RiskLevel::Low),
        _ => None,
    }
}

/// Locks accounts in the shared store
#[derive(Debug, Clone)]
pub struct EnforcementOperator {
    store: AccountStore,
}

impl EnforcementOperator {
    pub fn new(store: AccountStore) -> Self {
        Self { store }
    }

    /// Lock `user_id`, stamping the result with the current time
    pub fn lockdown(&self, user_id: &UserId, reason: &str) -> EnforcementOutcome {
        self.lockdown_at(user_id, reason, Utc::now())
    }

    pub fn lockdown_at(
        &self,
        user_id: &UserId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> EnforcementOutcome {
        tracing::info!(user_id = %user_id, reason = reason, "Initiating lockdown");

        match self.store.lock(user_id) {
            transition @ (LockTransition::Locked | LockTransition::AlreadyLocked) => {
                let audit_ticket = AuditTicket::at(now);
                tracing::warn!(
                    user_id = %user_id,
                    audit_ticket = %audit_ticket,
                    already_locked = transition == LockTransition::AlreadyLocked,
                    reason = reason,
                    "Account locked"
                );

                EnforcementOutcome::Success {
                    action_taken: format!("User {} account LOCKED. Session Killed.", user_id),
                    audit_ticket,
                    timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
                }
            }
            LockTransition::NotFound => {
                let known: Vec<String> =
                    self.store.ids().iter().map(|id| id.to_string()).collect();
                tracing::error!(
                    user_id = %user_id,
                    known_ids = ?known,
                    "Lockdown target not found"
                );

                EnforcementOutcome::Error {
                    message: format!("User ID {} not found.", user_id),
                }
            }
        }
    }

    /// Act on a judgment verdict: only CRITICAL triggers a lockdown
    pub fn execute(&self, user_id: &UserId, verdict: &str) -> EnforcementOutcome {
        match parse_verdict(verdict) {
            Some(RiskLevel::Critical) => self.lockdown(user_id, "Verdict CRITICAL"),
            _ => {
                tracing::info!(user_id = %user_id, verdict = verdict, "No enforcement required");
                EnforcementOutcome::NoAction {
                    message: format!("Verdict {} does not require enforcement.", verdict.trim()),
                }
            }
        }
    }
}
