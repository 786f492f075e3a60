//! The runtime loop.
//!
//! `Runtime` owns a control-plane client and a handler and processes
//! invocations strictly one at a time. The fetch-next call is the only
//! suspension point between cycles.

use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};

use byor_client::ControlPlane;
use byor_core::{classify, event_source, Invocation, TriggerCategory};

use crate::dispatch::dispatch;
use crate::error::{InvocationError, RuntimeError};
use crate::handler::Handler;

/// How a single cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A success payload was posted (or the post was attempted).
    Responded(TriggerCategory),
    /// An invocation error was reported instead of a result.
    Failed { error_type: String },
}

/// Long-lived invocation loop.
pub struct Runtime<C, H> {
    client: C,
    handler: H,
}

impl<C: ControlPlane, H: Handler> Runtime<C, H> {
    pub fn new(client: C, handler: H) -> Self {
        Self { client, handler }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Process invocations until fetching one fails.
    ///
    /// Returns the fatal error after it has been reported to the init
    /// error endpoint. The caller is expected to exit the process.
    pub async fn run(&self) -> RuntimeError {
        info!("runtime loop started");
        loop {
            if let Err(err) = self.cycle().await {
                return err;
            }
        }
    }

    /// Run one fetch → dispatch → report cycle.
    ///
    /// Only a failed fetch is returned as an error. Everything after a
    /// request id is known is reported to the control plane and folded
    /// into the [`CycleOutcome`].
    pub async fn cycle(&self) -> Result<CycleOutcome, RuntimeError> {
        let invocation = match self.client.next_invocation().await {
            Ok(invocation) => invocation,
            Err(err) => {
                let err = RuntimeError::from(err);
                error!(error = %err, "cannot obtain next invocation");
                if let Err(post_err) = self.client.post_init_error(&err.report()).await {
                    warn!(error = %post_err, "failed to report init error");
                }
                return Err(err);
            }
        };

        let span = info_span!("invocation", request_id = %invocation.metadata.request_id);
        Ok(self.process(invocation).instrument(span).await)
    }

    async fn process(&self, invocation: Invocation) -> CycleOutcome {
        let request_id = invocation.metadata.request_id.as_str();

        match self.respond(&invocation).await {
            Ok((category, payload)) => {
                match self.client.post_response(request_id, payload).await {
                    Ok(()) => debug!("response posted"),
                    Err(err) => warn!(error = %err, "failed to post response"),
                }
                CycleOutcome::Responded(category)
            }
            Err(err) => {
                let report = err.report();
                warn!(error = %err, error_type = %report.error_type, "invocation failed");
                match self.client.post_invoke_error(request_id, &report).await {
                    Ok(()) => debug!("invocation error reported"),
                    Err(post_err) => warn!(error = %post_err, "failed to report invocation error"),
                }
                CycleOutcome::Failed {
                    error_type: report.error_type,
                }
            }
        }
    }

    /// Parse, classify, dispatch and encode. Any error here is reported
    /// against the current request id.
    async fn respond(
        &self,
        invocation: &Invocation,
    ) -> Result<(TriggerCategory, Vec<u8>), InvocationError> {
        let root: Value =
            serde_json::from_str(&invocation.event).map_err(InvocationError::MalformedEvent)?;

        let category = classify(&root);
        if category == TriggerCategory::Unclassified {
            debug!(%category, source = %event_source(&root), "event classified");
        } else {
            debug!(%category, "event classified");
        }

        let dispatched = dispatch(
            &self.handler,
            category,
            &invocation.event,
            &root,
            &invocation.metadata,
        )
        .await?;

        let payload = dispatched.encode().map_err(InvocationError::Encode)?;
        Ok((category, payload))
    }
}
