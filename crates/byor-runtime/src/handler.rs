//! Handler boundary.
//!
//! A handler receives the raw event text and the cycle's metadata and
//! produces an [`Outcome`]. It never sees anything more structured than
//! the text; parsing is its own business.

use std::future::Future;

use byor_core::{HandlerError, InvocationMetadata, Outcome, Response};

/// User-supplied invocation handler.
///
/// Implemented for every `Fn(String, InvocationMetadata) -> impl Future<Output = Outcome>`,
/// so an async closure is enough:
///
/// ```
/// use byor_core::{InvocationMetadata, Outcome, Response};
/// use byor_runtime::Handler;
///
/// fn assert_handler(_: impl Handler) {}
///
/// assert_handler(|event: String, _meta: InvocationMetadata| async move {
///     let outcome: Outcome = Ok(Some(Response::ok(event)));
///     outcome
/// });
/// ```
pub trait Handler: Send + Sync {
    fn handle(
        &self,
        event: String,
        metadata: InvocationMetadata,
    ) -> impl Future<Output = Outcome> + Send;
}

impl<F, Fut> Handler for F
where
    F: Fn(String, InvocationMetadata) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome> + Send,
{
    fn handle(
        &self,
        event: String,
        metadata: InvocationMetadata,
    ) -> impl Future<Output = Outcome> + Send {
        self(event, metadata)
    }
}

/// Create a handler that echoes the event text back as a 200 body.
pub fn echo_handler() -> impl Handler {
    |event: String, _metadata: InvocationMetadata| async move {
        Ok::<_, HandlerError>(Some(Response::ok(event)))
    }
}

/// Create a handler that accepts every event and returns no value.
pub fn ack_handler() -> impl Handler {
    |_event: String, _metadata: InvocationMetadata| async move { Ok::<_, HandlerError>(None) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> InvocationMetadata {
        InvocationMetadata {
            request_id: "req-1".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn echo_handler_returns_event() {
        let outcome = echo_handler().handle("{\"a\":1}".to_string(), metadata()).await;
        assert_eq!(outcome, Ok(Some(Response::ok("{\"a\":1}"))));
    }

    #[tokio::test]
    async fn ack_handler_returns_nothing() {
        let outcome = ack_handler().handle("{}".to_string(), metadata()).await;
        assert_eq!(outcome, Ok(None));
    }

    #[tokio::test]
    async fn closure_sees_metadata() {
        let handler = |_event: String, meta: InvocationMetadata| async move {
            Ok::<_, HandlerError>(Some(Response::ok(meta.request_id)))
        };
        let outcome = handler.handle(String::new(), metadata()).await;
        assert_eq!(outcome.unwrap().unwrap().body.as_deref(), Some("req-1"));
    }
}
