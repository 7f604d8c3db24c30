//! Route table
//!
//! | method | path                 | handler                  |
//! |--------|----------------------|--------------------------|
//! | POST   | `/analyze`           | core analysis            |
//! | POST   | `/lockdown`          | core enforcement         |
//! | GET    | `/status/{user_id}`  | account status           |
//! | GET    | `/events`            | event log                |
//! | POST   | `/detective/analyze` | deprecated, `/analyze`   |
//! | POST   | `/judge/evaluate`    | judgment                 |
//! | POST   | `/enforcer/execute`  | deprecated, `/lockdown`  |
//! | POST   | `/clerk/report`      | compliance report        |
//! | GET    | `/health`, `/ready`  | probes                   |

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    health::{health, readiness},
    middleware::{deprecated, DeprecationInfo},
    state::AppState,
};

/// Canonical incident-response routes
pub fn core_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/lockdown", post(handlers::lockdown))
        .route("/status/{user_id}", get(handlers::status))
        .route("/events", get(handlers::events))
}

/// Per-stage pipeline routes
pub fn pipeline_routes() -> Router<AppState> {
    let detective = deprecated(
        Router::new().route("/detective/analyze", post(handlers::detective)),
        DeprecationInfo::new("/analyze"),
    );
    let enforcer = deprecated(
        Router::new().route("/enforcer/execute", post(handlers::execute)),
        DeprecationInfo::new("/lockdown"),
    );

    Router::new()
        .route("/judge/evaluate", post(handlers::judge))
        .route("/clerk/report", post(handlers::report))
        .merge(detective)
        .merge(enforcer)
}

/// Full application router, without server middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .merge(core_routes())
        .merge(pipeline_routes())
        .fallback(handlers::not_found)
        .with_state(state)
}
