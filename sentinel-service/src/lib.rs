//! # sentinel-service
//!
//! Incident-response simulation service. A login event flows through four
//! stages, each recorded in a bounded in-memory event log:
//!
//! - **Detective**: rule-based risk analysis of a login event
//! - **Judge**: verdict classification from a risk score and anomalies
//! - **Enforcer**: account lockdown in the in-memory account store
//! - **Clerk**: compliance report cross-checking enforcement against the store
//!
//! All state is in memory and resets on restart. Identifiers are trimmed
//! and lowercased on entry, so `" User_404 "` and `"user_404"` name the
//! same account.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sentinel_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app = router(AppState::new(config.clone()));
//!
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod analysis;
pub mod config;
pub mod enforcement;
pub mod error;
pub mod event_log;
pub mod extract;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod judgment;
pub mod middleware;
pub mod observability;
pub mod report;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::account::{
        Account, AccountStatus, AccountStore, AccountView, LockTransition, Role, UserId,
    };
    pub use crate::analysis::{LoginEvent, Recommendation, RiskAnalyzer, RiskAssessment, RiskLevel};
    pub use crate::config::{Config, PolicyConfig, SeedAccount};
    pub use crate::enforcement::{EnforcementOperator, EnforcementOutcome};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::event_log::{EventEntry, EventLog, Stage};
    pub use crate::extract::ApiJson;
    pub use crate::health::{health, readiness};
    pub use crate::ids::{AuditTicket, EventId, MakeTypedRequestId, ReportId, RequestId};
    pub use crate::judgment::{JudgmentPolicy, Verdict};
    pub use crate::middleware::{deprecated, DeprecationInfo};
    pub use crate::observability::init_tracing;
    pub use crate::report::{ComplianceReport, ComplianceReporter};
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::service::SentinelService;
    pub use crate::state::AppState;

    pub use axum::{
        extract::{Path, State},
        routing::{get, post},
        Json, Router,
    };

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, warn};
}
