//! Shared types used across byor crates.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::HandlerError;

/// Per-invocation metadata delivered in the fetch-next response headers.
///
/// Built fresh for every cycle and never reused across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationMetadata {
    /// Opaque request id. Always non-empty once obtained.
    pub request_id: String,
    /// Deadline as milliseconds since the Unix epoch; `0` when unknown.
    pub deadline_ms: u64,
    /// ARN of the invoked function, or empty.
    pub invoked_function_arn: String,
    /// Tracing header value, or empty.
    pub trace_id: String,
}

impl InvocationMetadata {
    /// Time left before the platform deadline.
    ///
    /// Returns `None` when no deadline was delivered. Saturates at zero
    /// once the deadline has passed.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.remaining_time_at(SystemTime::now())
    }

    fn remaining_time_at(&self, now: SystemTime) -> Option<Duration> {
        if self.deadline_ms == 0 {
            return None;
        }
        let deadline = UNIX_EPOCH + Duration::from_millis(self.deadline_ms);
        Some(deadline.duration_since(now).unwrap_or(Duration::ZERO))
    }
}

/// One invocation as handed out by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Raw event text. Expected to be JSON, but not validated here.
    pub event: String,
    pub metadata: InvocationMetadata,
}

/// Typed result a handler returns for HTTP-shaped triggers.
///
/// For every other trigger the value is discarded and only success or
/// failure matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub body: Option<String>,
}

impl Response {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: Some(body.into()),
        }
    }

    /// A 200 response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// A response with a status code and no body.
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            body: None,
        }
    }
}

/// Outcome of a single handler call.
///
/// `Ok(None)` is a success with no value; HTTP triggers encode it as an
/// empty 200.
pub type Outcome = Result<Option<Response>, HandlerError>;

/// Error payload posted to the `/init/error` and `/invocation/{id}/error`
/// endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error_message: String,
    pub error_type: String,
}

impl ErrorReport {
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            error_type: error_type.into(),
        }
    }
}

impl From<&HandlerError> for ErrorReport {
    fn from(err: &HandlerError) -> Self {
        Self::new(err.error_type(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(deadline_ms: u64) -> InvocationMetadata {
        InvocationMetadata {
            request_id: "req-1".to_string(),
            deadline_ms,
            ..Default::default()
        }
    }

    #[test]
    fn remaining_time_none_without_deadline() {
        assert_eq!(metadata(0).remaining_time(), None);
    }

    #[test]
    fn remaining_time_counts_down_to_deadline() {
        let now = UNIX_EPOCH + Duration::from_millis(10_000);
        let remaining = metadata(12_500).remaining_time_at(now);
        assert_eq!(remaining, Some(Duration::from_millis(2_500)));
    }

    #[test]
    fn remaining_time_saturates_after_deadline() {
        let now = UNIX_EPOCH + Duration::from_millis(20_000);
        assert_eq!(metadata(12_500).remaining_time_at(now), Some(Duration::ZERO));
    }

    #[test]
    fn response_constructors() {
        assert_eq!(Response::ok("hi"), Response::new(200, "hi"));
        assert_eq!(Response::status(204).body, None);
    }

    #[test]
    fn error_report_from_handler_error() {
        let err = HandlerError::new("boom").with_type("Validation");
        let report = ErrorReport::from(&err);
        assert_eq!(report.error_type, "Validation");
        assert_eq!(report.error_message, "boom");
    }
}
