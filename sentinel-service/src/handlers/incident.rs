//! Core incident-response endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    account::AccountView,
    analysis::RiskAssessment,
    enforcement::{EnforcementOutcome, LockdownRequest},
    event_log::EventEntry,
    extract::ApiJson,
    state::AppState,
};

/// Body of `POST /analyze`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub ip_address: String,
    pub location: String,
    pub user_id: String,
}

/// Score a login event
pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeRequest>,
) -> Json<RiskAssessment> {
    Json(
        state
            .sentinel()
            .analyze(&request.ip_address, &request.location, &request.user_id),
    )
}

/// Lock an account
///
/// An unknown id is reported as `{"status": "ERROR"}` with 200 OK.
pub async fn lockdown(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LockdownRequest>,
) -> Json<EnforcementOutcome> {
    Json(state.sentinel().lockdown(&request.user_id, &request.reason))
}

/// Current account record, or `{"status": "UNKNOWN"}`
pub async fn status(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<AccountView> {
    Json(state.sentinel().status(&user_id))
}

/// Event log, most recent first
pub async fn events(State(state): State<AppState>) -> Json<Vec<EventEntry>> {
    Json(state.sentinel().recent_events())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountStatus;

    #[tokio::test]
    async fn test_lockdown_then_status() {
        let state = AppState::default();

        let Json(outcome) = lockdown(
            State(state.clone()),
            ApiJson(LockdownRequest {
                user_id: "USER_404".to_string(),
                reason: "test".to_string(),
            }),
        )
        .await;
        assert!(outcome.is_success());

        let Json(view) = status(State(state), Path(" user_404 ".to_string())).await;
        assert_eq!(view.status(), AccountStatus::Locked);
    }

    #[tokio::test]
    async fn test_events_empty_until_stage_runs() {
        let state = AppState::default();
        let Json(entries) = events(State(state.clone())).await;
        assert!(entries.is_empty());

        analyze(
            State(state.clone()),
            ApiJson(AnalyzeRequest {
                ip_address: "8.8.8.8".to_string(),
                location: "Canada".to_string(),
                user_id: "user_101".to_string(),
            }),
        )
        .await;

        let Json(entries) = events(State(state)).await;
        assert_eq!(entries.len(), 1);
    }
}
