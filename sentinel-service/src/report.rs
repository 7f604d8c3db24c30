//! Compliance reports
//!
//! A report cross-checks what the caller claims enforcement did against
//! the account store. Reports are not persisted; the event log keeps the
//! most recent ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountStatus, AccountStore, UserId};
use crate::ids::ReportId;

/// Body of `POST /clerk/report`
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub user_id: String,
    pub enforcement_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub report_id: ReportId,
    pub user_id: UserId,
    /// Enforcement status as reported, uppercased
    pub enforcement_status: String,
    /// Status found in the store at report time
    pub account_status: AccountStatus,
    /// Reported status agrees with the store (SUCCESS iff LOCKED)
    pub compliant: bool,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ComplianceReporter {
    store: AccountStore,
}

impl ComplianceReporter {
    pub fn new(store: AccountStore) -> Self {
        Self { store }
    }

    pub fn report(&self, user_id: &UserId, enforcement_status: &str) -> ComplianceReport {
        let enforcement_status = enforcement_status.trim().to_uppercase();
        let account_status = self.store.view(user_id).status();

        let claims_locked = enforcement_status == "SUCCESS";
        let compliant = claims_locked == (account_status == AccountStatus::Locked);

        let summary = match (claims_locked, account_status) {
            (true, AccountStatus::Locked) => {
                format!("Lockdown of {} confirmed; account is LOCKED.", user_id)
            }
            (true, status) => format!(
                "Lockdown of {} reported but account is {}.",
                user_id, status
            ),
            (false, AccountStatus::Locked) => format!(
                "Enforcement reported {} but account {} is LOCKED.",
                enforcement_status, user_id
            ),
            (false, status) => format!(
                "No lockdown recorded for {}; account is {}.",
                user_id, status
            ),
        };

        let report = ComplianceReport {
            report_id: ReportId::new(),
            user_id: user_id.clone(),
            enforcement_status,
            account_status,
            compliant,
            summary,
            generated_at: Utc::now(),
        };

        if report.compliant {
            tracing::info!(report_id = %report.report_id, user_id = %user_id, "Compliance report filed");
        } else {
            tracing::warn!(
                report_id = %report.report_id,
                user_id = %user_id,
                enforcement_status = %report.enforcement_status,
                account_status = %account_status,
                "Compliance mismatch"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn reporter() -> (ComplianceReporter, AccountStore) {
        let store = AccountStore::seeded(&Config::default().seed);
        (ComplianceReporter::new(store.clone()), store)
    }

    #[test]
    fn test_confirmed_lockdown() {
        let (reporter, store) = reporter();
        let id = UserId::new("user_404");
        store.lock(&id);

        let report = reporter.report(&UserId::new("USER_404"), "success");
        assert_eq!(report.user_id, id);
        assert_eq!(report.enforcement_status, "SUCCESS");
        assert_eq!(report.account_status, AccountStatus::Locked);
        assert!(report.compliant);
    }

    #[test]
    fn test_claimed_lockdown_not_applied() {
        let (reporter, _) = reporter();
        let report = reporter.report(&UserId::new("user_404"), "SUCCESS");
        assert_eq!(report.account_status, AccountStatus::Active);
        assert!(!report.compliant);
        assert!(report.summary.contains("ACTIVE"));
    }

    #[test]
    fn test_unknown_account() {
        let (reporter, _) = reporter();
        let report = reporter.report(&UserId::new("ghost_1"), "ERROR");
        assert_eq!(report.account_status, AccountStatus::Unknown);
        assert!(report.compliant);
    }

    #[test]
    fn test_wire_fields() {
        let (reporter, _) = reporter();
        let value = serde_json::to_value(reporter.report(&UserId::new("user_101"), "NO_ACTION"))
            .unwrap();

        assert!(value["report_id"].as_str().unwrap().starts_with("rpt_"));
        assert_eq!(value["user_id"], "user_101");
        assert_eq!(value["enforcement_status"], "NO_ACTION");
        assert_eq!(value["account_status"], "ACTIVE");
        assert_eq!(value["compliant"], true);
        assert!(value["generated_at"].is_string());
    }
}
