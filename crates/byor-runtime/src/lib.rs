//! byor-runtime — the invocation loop of the custom function runtime.
//!
//! Drives the fetch → classify → dispatch → report cycle forever, one
//! invocation at a time, against any [`ControlPlane`](byor_client::ControlPlane).
//!
//! # Architecture
//!
//! ```text
//! Runtime::run
//!   └── loop: Runtime::cycle
//!         ├── ControlPlane::next_invocation   (fatal on failure)
//!         ├── serde_json::from_str + classify
//!         ├── dispatch → Handler (once, or once per queue record)
//!         ├── Dispatched::encode
//!         └── post_response | post_invoke_error
//! ```
//!
//! Failures are recovered at the narrowest scope that keeps the loop
//! moving: per record for queue batches, per cycle for everything else.
//! Only a failed fetch, where no request id is known, ends the loop.

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod runtime;

pub use dispatch::{dispatch, Dispatched};
pub use error::{InvocationError, RuntimeError};
pub use handler::Handler;
pub use runtime::{CycleOutcome, Runtime};
