//! HTTP handlers
//!
//! Handlers only translate between JSON and [`crate::service::SentinelService`]
//! calls. The core surface lives in [`incident`]; the per-stage pipeline
//! surface lives in [`pipeline`].

pub mod incident;
pub mod pipeline;

use axum::http::Uri;

use crate::error::Error;

pub use incident::{analyze, events, lockdown, status, AnalyzeRequest};
pub use pipeline::{detective, execute, judge, report, DetectiveRequest};

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> Error {
    Error::NotFound(format!("No route for {}", uri.path()))
}
