//! Type-safe identifiers in the TypeID format
//!
//! Every identifier the service mints is a prefixed, UUIDv7-backed TypeID,
//! so ids sort by creation time and carry their kind in the prefix:
//!
//! - `req_…` for HTTP request ids (set by the request tracking middleware)
//! - `evt_…` for event log entries
//! - `rpt_…` for compliance reports
//!
//! Audit tickets are the exception: downstream ticketing expects the
//! `JIRA-<unix seconds>` format, see [`AuditTicket`].
//!
//! ```rust
//! use sentinel_service::ids::EventId;
//!
//! let id = EventId::new();
//! assert!(id.as_str().starts_with("evt_"));
//! ```

use chrono::{DateTime, Utc};
use http::Request;
use mti::prelude::*;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Error type for identifier parsing.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The ID could not be parsed as a valid TypeID.
    #[error("failed to parse identifier: {0}")]
    Parse(#[from] MagicTypeIdError),

    /// The prefix was not the expected value.
    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        /// The expected prefix.
        expected: String,
        /// The actual prefix found.
        actual: String,
    },
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(MagicTypeId);

        impl $name {
            /// The TypeID prefix for this identifier kind
            pub const PREFIX: &'static str = $prefix;

            /// Creates a new time-sortable identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Self::PREFIX.create_type_id::<V7>())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns the prefix portion of the identifier.
            #[must_use]
            pub fn prefix(&self) -> &str {
                self.0.prefix().as_str()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mti = MagicTypeId::from_str(s)?;

                if mti.prefix().as_str() != Self::PREFIX {
                    return Err(IdError::InvalidPrefix {
                        expected: Self::PREFIX.to_string(),
                        actual: mti.prefix().as_str().to_string(),
                    });
                }

                Ok(Self(mti))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

typed_id!(
    /// Request identifier propagated in the `x-request-id` header.
    ///
    /// Example: `req_01h455vb4pex5vsknk084sn02q`
    RequestId,
    "req"
);

typed_id!(
    /// Identifier of a single event log entry.
    EventId,
    "evt"
);

typed_id!(
    /// Identifier of a compliance report.
    ReportId,
    "rpt"
);

/// Audit ticket minted for every enforcement action.
///
/// Derived from the wall clock at second resolution: `JIRA-1718000000`.
/// Two lockdowns within the same second share a ticket number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AuditTicket(String);

impl AuditTicket {
    pub const PREFIX: &'static str = "JIRA";

    /// Mint a ticket for the given instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", Self::PREFIX, instant.timestamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuditTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `MakeRequestId` implementation that generates `RequestId`s for tower-http.
///
/// Used with `tower_http::request_id::SetRequestIdLayer` by the server's
/// middleware stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_id_new() {
        let id = RequestId::new();
        assert!(id.as_str().starts_with("req_"));
        assert_eq!(id.prefix(), "req");
        // prefix (3) + underscore (1) + suffix (26)
        assert_eq!(id.as_str().len(), 30);
    }

    #[test]
    fn test_event_and_report_prefixes() {
        assert_eq!(EventId::new().prefix(), "evt");
        assert_eq!(ReportId::new().prefix(), "rpt");
    }

    #[test]
    fn test_parse_roundtrip() {
        let id_str = "evt_01h455vb4pex5vsknk084sn02q";
        let id = EventId::from_str(id_str).unwrap();
        assert_eq!(id.as_str(), id_str);
    }

    #[test]
    fn test_invalid_prefix() {
        let result = EventId::from_str("req_01h455vb4pex5vsknk084sn02q");

        match result.unwrap_err() {
            IdError::InvalidPrefix { expected, actual } => {
                assert_eq!(expected, "evt");
                assert_eq!(actual, "req");
            }
            other => panic!("Expected InvalidPrefix error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_format() {
        assert!(ReportId::from_str("rpt_invalid").is_err());
    }

    #[test]
    fn test_event_ids_are_time_ordered() {
        let id1 = EventId::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let id2 = EventId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ReportId::new();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.as_str().to_string()));
    }

    #[test]
    fn test_audit_ticket_uses_unix_seconds() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 10, 6, 13, 20).unwrap();
        let ticket = AuditTicket::at(instant);
        assert_eq!(ticket.as_str(), "JIRA-1718000000");
        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            serde_json::json!("JIRA-1718000000")
        );
    }

    #[test]
    fn test_make_typed_request_id() {
        let mut maker = MakeTypedRequestId;
        let request = http::Request::builder().body(()).unwrap();

        let header_value = maker.make_request_id(&request).unwrap().into_header_value();
        assert!(header_value.to_str().unwrap().starts_with("req_"));
    }
}
