//! The sentinel service object
//!
//! [`SentinelService`] owns the account store and the event log and exposes
//! every workflow step as a method. HTTP handlers are thin wrappers around
//! these methods; tests build a fresh instance each.
//!
//! ```rust
//! use sentinel_service::prelude::*;
//!
//! let sentinel = SentinelService::from_config(&Config::default());
//! let outcome = sentinel.lockdown(" USER_404 ", "impossible travel");
//! assert!(outcome.is_success());
//! assert_eq!(sentinel.status("user_404").status(), AccountStatus::Locked);
//! ```

use serde::Serialize;

use crate::account::{AccountStore, AccountView, UserId};
use crate::analysis::{LoginEvent, RiskAnalyzer, RiskAssessment};
use crate::config::Config;
use crate::enforcement::{EnforcementOperator, EnforcementOutcome};
use crate::event_log::{EventEntry, EventLog, Stage};
use crate::judgment::{JudgmentPolicy, Verdict};
use crate::report::{ComplianceReport, ComplianceReporter};

#[derive(Debug, Clone)]
pub struct SentinelService {
    store: AccountStore,
    events: EventLog,
    analyzer: RiskAnalyzer,
    judgment: JudgmentPolicy,
    enforcer: EnforcementOperator,
    reporter: ComplianceReporter,
}

impl SentinelService {
    /// Assemble a service around an existing store and log
    pub fn new(
        store: AccountStore,
        events: EventLog,
        analyzer: RiskAnalyzer,
        judgment: JudgmentPolicy,
    ) -> Self {
        Self {
            enforcer: EnforcementOperator::new(store.clone()),
            reporter: ComplianceReporter::new(store.clone()),
            store,
            events,
            analyzer,
            judgment,
        }
    }

    /// Seeded store, bounded log and policy taken from configuration
    pub fn from_config(config: &Config) -> Self {
        let service = Self::new(
            AccountStore::seeded(&config.seed),
            EventLog::with_capacity(config.policy.event_log_capacity),
            RiskAnalyzer::from_policy(&config.policy),
            JudgmentPolicy::from_policy(&config.policy),
        );

        tracing::info!(
            accounts = service.store.len(),
            event_log_capacity = service.events.capacity(),
            "Sentinel service initialized"
        );

        service
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Score a login event (DETECTIVE)
    pub fn analyze(&self, ip_address: &str, location: &str, user_id: &str) -> RiskAssessment {
        let assessment = self
            .analyzer
            .analyze(ip_address, location, &UserId::new(user_id));
        self.record(Stage::Detective, &assessment);
        assessment
    }

    pub fn analyze_event(&self, event: &LoginEvent) -> RiskAssessment {
        self.analyze(&event.ip_address, &event.location, &event.user_id)
    }

    /// Classify a score and anomaly labels (JUDGE)
    pub fn judge(&self, risk_score: f64, anomalies: &[String]) -> Verdict {
        let verdict = self.judgment.evaluate(risk_score, anomalies);
        self.record(Stage::Judge, &verdict);
        verdict
    }

    /// Lock an account (ENFORCER)
    pub fn lockdown(&self, user_id: &str, reason: &str) -> EnforcementOutcome {
        let outcome = self.enforcer.lockdown(&UserId::new(user_id), reason);
        self.record(Stage::Enforcer, &outcome);
        outcome
    }

    /// Lock an account if the verdict is CRITICAL (ENFORCER)
    pub fn execute(&self, user_id: &str, verdict: &str) -> EnforcementOutcome {
        let outcome = self.enforcer.execute(&UserId::new(user_id), verdict);
        self.record(Stage::Enforcer, &outcome);
        outcome
    }

    /// File a compliance report (CLERK)
    pub fn report(&self, user_id: &str, enforcement_status: &str) -> ComplianceReport {
        let report = self
            .reporter
            .report(&UserId::new(user_id), enforcement_status);
        self.record(Stage::Clerk, &report);
        report
    }

    /// Current record for an identifier, UNKNOWN when absent. Not logged.
    pub fn status(&self, user_id: &str) -> AccountView {
        self.store.view(&UserId::new(user_id))
    }

    /// Event log snapshot, most recent first
    pub fn recent_events(&self) -> Vec<EventEntry> {
        self.events.recent()
    }

    fn record<T: Serialize>(&self, stage: Stage, result: &T) {
        match serde_json::to_value(result) {
            Ok(value) => {
                let id = self.events.append(stage, value);
                tracing::debug!(event_id = %id, stage = %stage, "Stage outcome recorded");
            }
            Err(e) => tracing::error!(stage = %stage, "Failed to record stage outcome: {}", e),
        }
    }
}

impl Default for SentinelService {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
