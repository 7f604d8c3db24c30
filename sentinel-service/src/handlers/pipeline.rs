//! Per-stage pipeline endpoints
//!
//! `/detective/analyze` and `/enforcer/execute` are deprecated in favour of
//! `/analyze` and `/lockdown`; see [`crate::routes`].

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    analysis::{LoginEvent, RiskAssessment},
    enforcement::{EnforcementOutcome, ExecuteRequest},
    error::{Error, Result},
    extract::ApiJson,
    judgment::{JudgmentRequest, Verdict},
    report::{ComplianceReport, ReportRequest},
    state::AppState,
};

/// Body of `POST /detective/analyze`
///
/// `log_json` is either a login event object or a string holding one.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectiveRequest {
    pub log_json: Value,
}

impl DetectiveRequest {
    /// Decode the embedded login event; absent fields become empty strings
    pub fn into_event(self) -> Result<LoginEvent> {
        match self.log_json {
            Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
                if e.is_data() {
                    Error::ValidationError(format!("Invalid log_json: {}", e))
                } else {
                    Error::BadRequest(format!("log_json is not valid JSON: {}", e))
                }
            }),
            value @ Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| Error::ValidationError(format!("Invalid log_json: {}", e))),
            other => Err(Error::ValidationError(format!(
                "log_json must be an object or a JSON string, got {}",
                json_type(&other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Score an embedded login event
pub async fn detective(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DetectiveRequest>,
) -> Result<Json<RiskAssessment>> {
    let event = request.into_event()?;
    Ok(Json(state.sentinel().analyze_event(&event)))
}

/// Classify a risk score
pub async fn judge(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JudgmentRequest>,
) -> Json<Verdict> {
    Json(state.sentinel().judge(request.risk_score, &request.anomalies))
}

/// Lock the account when the verdict is CRITICAL
pub async fn execute(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExecuteRequest>,
) -> Json<EnforcementOutcome> {
    Json(state.sentinel().execute(&request.user_id, &request.verdict))
}

/// File a compliance report
pub async fn report(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Json<ComplianceReport> {
    Json(
        state
            .sentinel()
            .report(&request.user_id, &request.enforcement_status),
    )
}
