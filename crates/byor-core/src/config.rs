//! Runtime configuration discovered from the process environment.

use crate::error::ConfigError;

/// Environment variable holding the control-plane `host:port`.
pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

/// Runtime API version segment used in every endpoint path.
pub const DEFAULT_API_VERSION: &str = "2018-06-01";

/// Immutable runtime session configuration.
///
/// Created once at startup and handed to the control-plane client. Never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// `host:port` of the control plane.
    pub api_address: String,
    /// Version path segment, e.g. `2018-06-01`.
    pub api_version: String,
}

impl RuntimeConfig {
    pub fn new(api_address: impl Into<String>) -> Self {
        Self {
            api_address: api_address.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup(RUNTIME_API_VAR).ok_or(ConfigError::MissingVariable(RUNTIME_API_VAR))?;
        let address = address.trim();
        if address.is_empty() {
            return Err(ConfigError::BlankVariable(RUNTIME_API_VAR));
        }
        Ok(Self::new(address))
    }

    /// Builder method: override the API version segment.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Path prefix shared by every endpoint, e.g. `/2018-06-01/runtime`.
    pub fn path_prefix(&self) -> String {
        format!("/{}/runtime", self.api_version)
    }

    /// Full base URL, e.g. `http://127.0.0.1:9001/2018-06-01/runtime`.
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.api_address, self.path_prefix())
    }
}
