//! Deprecation headers for superseded routes
//!
//! The pipeline stage routes `/detective/analyze` and `/enforcer/execute`
//! duplicate the canonical `/analyze` and `/lockdown` routes. They keep
//! working, but every response they produce advertises its successor:
//!
//! ```text
//! Deprecation: true
//! Link: </analyze>; rel="successor-version"
//! Warning: 299 - "Deprecated API: use /analyze instead."
//! ```

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    Router,
};
use serde::{Deserialize, Serialize};

/// Deprecation information for a route group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeprecationInfo {
    /// Path of the canonical replacement route
    pub successor: String,
}

impl DeprecationInfo {
    /// Create deprecation info pointing at `successor`
    pub fn new(successor: impl Into<String>) -> Self {
        Self {
            successor: successor.into(),
        }
    }

    fn link_header(&self) -> String {
        format!("<{}>; rel=\"successor-version\"", self.successor)
    }

    fn warning_header(&self) -> String {
        format!("299 - \"Deprecated API: use {} instead.\"", self.successor)
    }
}

/// Attach deprecation headers to every response from `router`
pub fn deprecated<S>(router: Router<S>, info: DeprecationInfo) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(move |req: Request, next: Next| {
        let info = info.clone();
        async move {
            let path = req.uri().path().to_string();
            let mut response = next.run(req).await;
            tracing::debug!(path = %path, successor = %info.successor, "Deprecated route called");

            let headers = response.headers_mut();
            headers.insert("Deprecation", HeaderValue::from_static("true"));

            if let Ok(value) = HeaderValue::from_str(&info.link_header()) {
                headers.insert(header::LINK, value);
            }

            if let Ok(value) = HeaderValue::from_str(&info.warning_header()) {
                headers.insert(header::WARNING, value);
            }

            response
        }
    }))
}
