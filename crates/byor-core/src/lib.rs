//! byor-core — shared types for the custom function runtime.
//!
//! Holds everything that is pure: invocation metadata, handler outcome
//! types, the runtime configuration read from the environment, the
//! event classifier, and the response codec. No I/O happens here.

pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use classify::{classify, event_source, EventSource, TriggerCategory};
pub use config::RuntimeConfig;
pub use error::{ConfigError, HandlerError};
pub use types::*;
