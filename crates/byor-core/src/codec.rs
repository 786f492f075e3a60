//! Response codec.
//!
//! Builds the exact payloads the control plane expects for each trigger
//! family, plus the error-report body. Field order is fixed by the
//! struct declarations, so output is byte-for-byte deterministic.

use serde::Serialize;

use crate::types::{ErrorReport, Response};

/// Content type advertised in every HTTP-family response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpEnvelope<'a> {
    status_code: u16,
    headers: HttpHeaders,
    body: &'a str,
    is_base64_encoded: bool,
}

#[derive(Serialize)]
struct HttpHeaders {
    #[serde(rename = "Content-Type")]
    content_type: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchResult<'a> {
    batch_item_failures: Vec<BatchItemFailure<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchItemFailure<'a> {
    item_identifier: &'a str,
}

#[derive(Serialize)]
struct Ack {}

/// Wrap a handler result for an HTTP trigger.
///
/// `None` encodes as an empty 200. A missing body is emitted as `""`.
pub fn encode_http(response: Option<&Response>) -> serde_json::Result<Vec<u8>> {
    let (status_code, body) = match response {
        Some(r) => (r.status_code, r.body.as_deref().unwrap_or("")),
        None => (200, ""),
    };
    serde_json::to_vec(&HttpEnvelope {
        status_code,
        headers: HttpHeaders {
            content_type: JSON_CONTENT_TYPE,
        },
        body,
        is_base64_encoded: false,
    })
}

/// Encode the partial-failure report for a queue batch.
///
/// An empty failure set means every item succeeded and encodes as `{}`.
pub fn encode_batch_result(failed_ids: &[String]) -> serde_json::Result<Vec<u8>> {
    if failed_ids.is_empty() {
        return encode_ack();
    }
    serde_json::to_vec(&BatchResult {
        batch_item_failures: failed_ids
            .iter()
            .map(|id| BatchItemFailure { item_identifier: id })
            .collect(),
    })
}

/// Empty acknowledgment (`{}`).
pub fn encode_ack() -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&Ack {})
}

/// Encode an error report as `{"errorMessage":…,"errorType":…}`.
pub fn encode_error(report: &ErrorReport) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(report)
}
