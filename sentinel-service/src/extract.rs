//! Request extractors

use axum::extract::FromRequest;

use crate::error::Error;

/// JSON body extractor whose rejections render as [`Error`] responses
///
/// Unparseable JSON maps to 400, a body that parses but does not match the
/// expected shape maps to 422, and a missing `application/json` content type
/// maps to 415.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
