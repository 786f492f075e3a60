//! Error types shared by the runtime crates.

use std::fmt;

use thiserror::Error;

/// Errors raised while reading the runtime configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("environment variable {0} is blank")]
    BlankVariable(&'static str),
}

/// Failure signalled by a handler.
///
/// Carries a stable `error_type` naming the kind of failure and a
/// human-readable message. Both end up in the error report posted to the
/// control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    error_type: String,
    message: String,
}

impl HandlerError {
    /// Type name used when the handler does not supply one.
    pub const DEFAULT_TYPE: &'static str = "HandlerError";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_type: Self::DEFAULT_TYPE.to_string(),
            message: message.into(),
        }
    }

    /// Override the reported error type.
    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = error_type.into();
        self
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for HandlerError {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}
