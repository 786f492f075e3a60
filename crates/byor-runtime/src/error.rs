//! Error types for the runtime loop.

use thiserror::Error;

use byor_client::ClientError;
use byor_core::{ErrorReport, HandlerError};

/// A failure that ends one invocation cycle.
///
/// Reported to `/invocation/{id}/error`; the loop continues afterwards.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("{0}")]
    Handler(#[from] HandlerError),

    #[error("malformed event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl InvocationError {
    /// Stable name for the kind of failure.
    pub fn error_type(&self) -> &str {
        match self {
            InvocationError::Handler(err) => err.error_type(),
            InvocationError::MalformedEvent(_) => "Runtime.MalformedEvent",
            InvocationError::Encode(_) => "Runtime.EncodeError",
        }
    }

    /// Body posted to the invocation error endpoint.
    pub fn report(&self) -> ErrorReport {
        match self {
            InvocationError::Handler(err) => ErrorReport::from(err),
            other => ErrorReport::new(other.error_type(), other.to_string()),
        }
    }
}

/// A failure that ends the runtime loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Fetching the next invocation failed, so there is no request id to
    /// report against.
    #[error("failed to fetch next invocation: {0}")]
    Fetch(#[from] ClientError),
}

impl RuntimeError {
    /// Body posted to the init error endpoint.
    pub fn report(&self) -> ErrorReport {
        match self {
            RuntimeError::Fetch(err) => ErrorReport::new(err.error_type(), err.to_string()),
        }
    }
}
