//! Error types for the control-plane client.

use thiserror::Error;

/// Result type alias for control-plane calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the Runtime API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to runtime api: {0}")]
    Connect(#[source] std::io::Error),

    #[error("http handshake failed: {0}")]
    Handshake(#[source] hyper::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),

    #[error("request failed: {0}")]
    Request(#[source] hyper::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),

    #[error("runtime api returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response is missing required header {0}")]
    MissingHeader(&'static str),

    #[error("failed to encode error report: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ClientError {
    /// Stable error type name used when this failure is reported upstream.
    pub fn error_type(&self) -> &'static str {
        "Runtime.TransportError"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_display() {
        let err = ClientError::MissingHeader("lambda-runtime-aws-request-id");
        assert_eq!(
            err.to_string(),
            "response is missing required header lambda-runtime-aws-request-id"
        );
        assert_eq!(err.error_type(), "Runtime.TransportError");
    }

    #[test]
    fn encode_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClientError::Encode(source);
        assert!(err.to_string().starts_with("failed to encode error report: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn status_display() {
        let err = ClientError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "runtime api returned status 500: boom");
    }
}
