//! Runtime API client.
//!
//! `RuntimeApiClient` opens one HTTP/1.1 connection per call: plain
//! `TcpStream`, hyper handshake, and the connection driven on a spawned
//! task.

use std::future::Future;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::{HeaderMap, HeaderValue, Method};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use byor_core::codec::{encode_error, JSON_CONTENT_TYPE};
use byor_core::{ErrorReport, Invocation, InvocationMetadata, RuntimeConfig};

use crate::error::{ClientError, ClientResult};

pub const REQUEST_ID_HEADER: &str = "lambda-runtime-aws-request-id";
pub const DEADLINE_HEADER: &str = "lambda-runtime-deadline-ms";
pub const FUNCTION_ARN_HEADER: &str = "lambda-runtime-invoked-function-arn";
pub const TRACE_ID_HEADER: &str = "lambda-runtime-trace-id";
pub const ERROR_TYPE_HEADER: &str = "lambda-runtime-function-error-type";

const DEFAULT_USER_AGENT: &str = concat!("byor/", env!("CARGO_PKG_VERSION"));

/// The four verbs of the Runtime API.
///
/// Implementations must not retry: every call is attempted exactly once.
pub trait ControlPlane {
    /// Block until the platform hands out the next invocation.
    fn next_invocation(&self) -> impl Future<Output = ClientResult<Invocation>> + Send;

    /// Post the encoded success payload for an invocation.
    fn post_response(
        &self,
        request_id: &str,
        payload: Vec<u8>,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// Report a failure for a single invocation.
    fn post_invoke_error(
        &self,
        request_id: &str,
        report: &ErrorReport,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// Report a failure that happened before any request id was known.
    fn post_init_error(&self, report: &ErrorReport) -> impl Future<Output = ClientResult<()>> + Send;
}

/// HTTP client for the Runtime API at `config.api_address`.
#[derive(Debug, Clone)]
pub struct RuntimeApiClient {
    config: RuntimeConfig,
}

impl RuntimeApiClient {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.config.path_prefix())
    }

    /// Send one request on a fresh connection and collect the response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<(Vec<u8>, Option<&str>)>,
    ) -> ClientResult<http::Response<Bytes>> {
        let address = &self.config.api_address;
        let stream = TcpStream::connect(address.as_str())
            .await
            .map_err(ClientError::Connect)?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(ClientError::Handshake)?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "runtime api connection closed with error");
            }
        });

        let mut builder = http::Request::builder()
            .method(method)
            .uri(path)
            .header(HOST, address.as_str())
            .header(USER_AGENT, DEFAULT_USER_AGENT);

        let payload = match body {
            Some((bytes, error_type)) => {
                builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
                // The body carries the type too, so an unusable header value
                // is dropped rather than failing the whole report.
                match error_type.map(HeaderValue::from_str) {
                    Some(Ok(value)) => builder = builder.header(ERROR_TYPE_HEADER, value),
                    Some(Err(_)) => warn!(?error_type, "error type is not a valid header value"),
                    None => {}
                }
                Bytes::from(bytes)
            }
            None => Bytes::new(),
        };
        let req = builder.body(Full::new(payload))?;

        let resp = sender.send_request(req).await.map_err(ClientError::Request)?;
        let (parts, body) = resp.into_parts();
        let body = body.collect().await.map_err(ClientError::Body)?.to_bytes();

        if !parts.status.is_success() {
            return Err(ClientError::Status {
                status: parts.status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(http::Response::from_parts(parts, body))
    }

    async fn post_report(&self, path: &str, report: &ErrorReport) -> ClientResult<()> {
        let payload = encode_error(report).map_err(ClientError::Encode)?;
        self.send(Method::POST, path, Some((payload, Some(report.error_type.as_str()))))
            .await?;
        Ok(())
    }
}

impl ControlPlane for RuntimeApiClient {
    async fn next_invocation(&self) -> ClientResult<Invocation> {
        let resp = self
            .send(Method::GET, &self.path("/invocation/next"), None)
            .await?;
        let metadata = metadata_from_headers(resp.headers())?;
        debug!(request_id = %metadata.request_id, "invocation received");

        Ok(Invocation {
            event: String::from_utf8_lossy(resp.body()).into_owned(),
            metadata,
        })
    }

    async fn post_response(&self, request_id: &str, payload: Vec<u8>) -> ClientResult<()> {
        let path = self.path(&format!("/invocation/{request_id}/response"));
        self.send(Method::POST, &path, Some((payload, None))).await?;
        Ok(())
    }

    async fn post_invoke_error(&self, request_id: &str, report: &ErrorReport) -> ClientResult<()> {
        let path = self.path(&format!("/invocation/{request_id}/error"));
        self.post_report(&path, report).await
    }

    async fn post_init_error(&self, report: &ErrorReport) -> ClientResult<()> {
        self.post_report(&self.path("/init/error"), report).await
    }
}

/// Build invocation metadata from fetch-next response headers.
///
/// The request id is mandatory and must be non-empty. The deadline
/// defaults to 0 when absent or unparseable; the ARN and trace id default
/// to empty strings.
pub fn metadata_from_headers(headers: &HeaderMap) -> ClientResult<InvocationMetadata> {
    let request_id = header_str(headers, REQUEST_ID_HEADER)
        .filter(|id| !id.is_empty())
        .ok_or(ClientError::MissingHeader(REQUEST_ID_HEADER))?;

    let deadline_ms = header_str(headers, DEADLINE_HEADER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    Ok(InvocationMetadata {
        request_id: request_id.to_string(),
        deadline_ms,
        invoked_function_arn: header_str(headers, FUNCTION_ARN_HEADER)
            .unwrap_or_default()
            .to_string(),
        trace_id: header_str(headers, TRACE_ID_HEADER)
            .unwrap_or_default()
            .to_string(),
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn metadata_all_headers() {
        let map = headers(&[
            (REQUEST_ID_HEADER, "req-1"),
            (DEADLINE_HEADER, "1700000000000"),
            (FUNCTION_ARN_HEADER, "arn:aws:lambda:us-east-1:1:function:f"),
            (TRACE_ID_HEADER, "Root=1-abc"),
        ]);
        let meta = metadata_from_headers(&map).unwrap();
        assert_eq!(meta.request_id, "req-1");
        assert_eq!(meta.deadline_ms, 1_700_000_000_000);
        assert_eq!(meta.invoked_function_arn, "arn:aws:lambda:us-east-1:1:function:f");
        assert_eq!(meta.trace_id, "Root=1-abc");
    }

    #[test]
    fn metadata_optional_headers_default() {
        let meta = metadata_from_headers(&headers(&[(REQUEST_ID_HEADER, "req-2")])).unwrap();
        assert_eq!(meta.deadline_ms, 0);
        assert!(meta.invoked_function_arn.is_empty());
        assert!(meta.trace_id.is_empty());
    }

    #[test]
    fn metadata_unparseable_deadline_is_zero() {
        let map = headers(&[(REQUEST_ID_HEADER, "req-3"), (DEADLINE_HEADER, "soon")]);
        assert_eq!(metadata_from_headers(&map).unwrap().deadline_ms, 0);
    }

    #[test]
    fn metadata_header_names_are_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            http::HeaderName::from_bytes(b"Lambda-Runtime-Aws-Request-Id").unwrap(),
            HeaderValue::from_static("req-4"),
        );
        assert_eq!(metadata_from_headers(&map).unwrap().request_id, "req-4");
    }

    #[test]
    fn metadata_missing_request_id() {
        let err = metadata_from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ClientError::MissingHeader(REQUEST_ID_HEADER)));
    }

    #[test]
    fn metadata_empty_request_id() {
        let err = metadata_from_headers(&headers(&[(REQUEST_ID_HEADER, "")])).unwrap_err();
        assert!(matches!(err, ClientError::MissingHeader(_)));
    }

    #[test]
    fn paths_use_configured_prefix() {
        let client = RuntimeApiClient::new(RuntimeConfig::new("127.0.0.1:9001"));
        assert_eq!(
            client.path("/invocation/next"),
            "/2018-06-01/runtime/invocation/next"
        );
    }
}
