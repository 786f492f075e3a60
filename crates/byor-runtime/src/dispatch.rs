//! Invocation dispatch.
//!
//! Decides how many times the handler runs for a classified event and
//! with which sub-payloads, then collects the outcomes into a
//! [`Dispatched`] value ready for encoding.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use serde_json::Value;
use tracing::{debug, warn};

use byor_core::codec::{encode_ack, encode_batch_result, encode_http};
use byor_core::{HandlerError, InvocationMetadata, Outcome, Response, TriggerCategory};

use crate::handler::Handler;

/// Error type reported when a handler panics instead of returning.
pub const HANDLER_PANIC_TYPE: &str = "Runtime.HandlerPanic";

/// Successful result of a dispatch, one variant per response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// HTTP trigger result, wrapped in the API envelope.
    Http(Option<Response>),
    /// Queue batch; holds the ids of records that failed, in order.
    Batch(Vec<String>),
    /// Fire-and-acknowledge.
    Ack,
}

impl Dispatched {
    /// Encode the payload posted to the response endpoint.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Dispatched::Http(response) => encode_http(response.as_ref()),
            Dispatched::Batch(failed_ids) => encode_batch_result(failed_ids),
            Dispatched::Ack => encode_ack(),
        }
    }
}

/// Run the handler for one classified event.
///
/// Returns `Err` only for HTTP and unclassified events whose single
/// handler call failed. Queue batches always complete: failures are
/// isolated per record and collected into [`Dispatched::Batch`].
pub async fn dispatch<H: Handler>(
    handler: &H,
    category: TriggerCategory,
    event: &str,
    root: &Value,
    metadata: &InvocationMetadata,
) -> Result<Dispatched, HandlerError> {
    match category {
        TriggerCategory::HttpV1 | TriggerCategory::HttpV2 => {
            let response = invoke(handler, event.to_string(), metadata).await?;
            Ok(Dispatched::Http(response))
        }
        TriggerCategory::QueueBatch => Ok(Dispatched::Batch(
            dispatch_batch(handler, root, metadata).await,
        )),
        TriggerCategory::Unclassified => {
            invoke(handler, event.to_string(), metadata).await?;
            Ok(Dispatched::Ack)
        }
    }
}

/// Call the handler once per queue record and return the failed ids.
async fn dispatch_batch<H: Handler>(
    handler: &H,
    root: &Value,
    metadata: &InvocationMetadata,
) -> Vec<String> {
    let Some(records) = root.get("Records").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut failures = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .unwrap_or("");

        match invoke(handler, record.to_string(), metadata).await {
            Ok(_) => debug!(index, message_id, "record processed"),
            Err(err) => {
                warn!(index, message_id, error = %err, "record failed");
                // Without an id the platform cannot redeliver the record.
                if !message_id.is_empty() {
                    failures.push(message_id.to_string());
                }
            }
        }
    }

    debug!(
        records = records.len(),
        failed = failures.len(),
        "queue batch processed"
    );
    failures
}

/// Call the handler, turning a panic into a [`HandlerError`].
async fn invoke<H: Handler>(handler: &H, event: String, metadata: &InvocationMetadata) -> Outcome {
    match AssertUnwindSafe(handler.handle(event, metadata.clone()))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(panic) => {
            Err(HandlerError::new(panic_message(panic.as_ref())).with_type(HANDLER_PANIC_TYPE))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
