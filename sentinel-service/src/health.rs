//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 503 Service Unavailable when the account store holds no
/// accounts, since every enforcement would then report a miss.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let sentinel = state.sentinel();
    let mut dependencies = HashMap::new();

    let accounts = sentinel.store().len();
    let store_ready = accounts > 0;
    if !store_ready {
        tracing::warn!("Account store is empty");
    }
    dependencies.insert(
        "account_store".to_string(),
        DependencyStatus {
            healthy: store_ready,
            message: Some(format!("{} accounts", accounts)),
        },
    );

    let events = sentinel.events();
    dependencies.insert(
        "event_log".to_string(),
        DependencyStatus {
            healthy: true,
            message: Some(format!("{}/{} entries", events.len(), events.capacity())),
        },
    );

    let response = ReadinessResponse {
        ready: store_ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if store_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let response = health(State(AppState::default())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_with_seeded_store() {
        let response = readiness(State(AppState::default())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_without_accounts() {
        let mut config = Config::default();
        config.seed.clear();

        let response = readiness(State(AppState::new(config))).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_dependency_status_shape() {
        let status = DependencyStatus {
            healthy: true,
            message: None,
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({"healthy": true})
        );
    }
}
