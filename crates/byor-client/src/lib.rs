//! byor-client — control-plane client for the custom function runtime.
//!
//! Speaks the Runtime API wire protocol: fetch the next invocation, post a
//! result, post an invocation error, post an init error. The client does
//! pure I/O and makes no decisions; each call is attempted exactly once.
//!
//! # Architecture
//!
//! ```text
//! Runtime loop
//!   │
//!   ▼
//! ControlPlane (trait)
//!   └── RuntimeApiClient
//!         ├── TcpStream::connect(api_address)
//!         ├── hyper http1 handshake
//!         └── GET /invocation/next | POST …/response | …/error | /init/error
//! ```
//!
//! The runtime is generic over [`ControlPlane`], so tests can swap in an
//! in-memory fake.

pub mod client;
pub mod error;

pub use client::{ControlPlane, RuntimeApiClient};
pub use error::{ClientError, ClientResult};
