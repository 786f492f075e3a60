//! Event-shape classification.
//!
//! Inspects an incoming event document and decides which trigger family
//! produced it. Classification is total: every JSON document maps to
//! exactly one [`TriggerCategory`], with unknown shapes falling through
//! to [`TriggerCategory::Unclassified`].

use std::fmt;

use serde_json::Value;

/// `eventSource` value carried by queue (SQS) records.
pub const QUEUE_EVENT_SOURCE: &str = "aws:sqs";

/// Trigger family of an event. Drives all response-shaping decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerCategory {
    /// REST API / payload format 1.0 (`httpMethod` at the root).
    HttpV1,
    /// HTTP API / payload format 2.0 (`requestContext.http.method`).
    HttpV2,
    /// Queue batch delivered as `Records` with per-record partial failure.
    QueueBatch,
    /// Everything else: invoked once and acknowledged with `{}`.
    Unclassified,
}

impl TriggerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerCategory::HttpV1 => "http-v1",
            TriggerCategory::HttpV2 => "http-v2",
            TriggerCategory::QueueBatch => "queue-batch",
            TriggerCategory::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational sub-label for fire-and-acknowledge events.
///
/// Only used for diagnostics; every variant is handled as
/// [`TriggerCategory::Unclassified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    Notification,
    Storage,
    Stream,
    Table,
    Scheduled,
    Unknown,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Notification => "notification",
            EventSource::Storage => "storage",
            EventSource::Stream => "stream",
            EventSource::Table => "table",
            EventSource::Scheduled => "scheduled",
            EventSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an event document. First matching probe wins.
pub fn classify(root: &Value) -> TriggerCategory {
    // v2 payloads may also carry v1-looking fields, so probe v2 first.
    if root.pointer("/requestContext/http/method").is_some() {
        return TriggerCategory::HttpV2;
    }
    if root.get("httpMethod").is_some() {
        return TriggerCategory::HttpV1;
    }
    if first_record(root).and_then(record_event_source) == Some(QUEUE_EVENT_SOURCE) {
        return TriggerCategory::QueueBatch;
    }
    TriggerCategory::Unclassified
}

/// Best-effort sub-label for an event outside the HTTP and queue families.
pub fn event_source(root: &Value) -> EventSource {
    if let Some(record) = first_record(root) {
        let source = record_event_source(record).unwrap_or("");
        if source == "aws:sns" || record.get("Sns").is_some() {
            return EventSource::Notification;
        }
        if record.get("s3").is_some() {
            return EventSource::Storage;
        }
        if source == "aws:kinesis" {
            return EventSource::Stream;
        }
        if source == "aws:dynamodb" {
            return EventSource::Table;
        }
    }
    if root.get("detail-type").is_some() && root.get("source").is_some() {
        return EventSource::Scheduled;
    }
    EventSource::Unknown
}

fn first_record(root: &Value) -> Option<&Value> {
    root.get("Records")?.as_array()?.first()
}

fn record_event_source(record: &Value) -> Option<&str> {
    record.get("eventSource")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_v2_by_request_context() {
        let event = json!({"requestContext": {"http": {"method": "GET"}}});
        assert_eq!(classify(&event), TriggerCategory::HttpV2);
    }

    #[test]
    fn http_v2_wins_over_other_markers() {
        let event = json!({
            "requestContext": {"http": {"method": "POST"}},
            "httpMethod": "POST",
            "Records": [{"eventSource": "aws:sqs"}],
            "detail-type": "x",
            "source": "y"
        });
        assert_eq!(classify(&event), TriggerCategory::HttpV2);
    }

    #[test]
    fn http_v1_by_http_method() {
        let event = json!({"httpMethod": "GET", "path": "/"});
        assert_eq!(classify(&event), TriggerCategory::HttpV1);
    }

    #[test]
    fn http_v1_wins_over_queue_records() {
        let event = json!({"httpMethod": "GET", "Records": [{"eventSource": "aws:sqs"}]});
        assert_eq!(classify(&event), TriggerCategory::HttpV1);
    }

    #[test]
    fn request_context_without_http_is_not_v2() {
        let event = json!({"requestContext": {"stage": "prod"}, "httpMethod": "GET"});
        assert_eq!(classify(&event), TriggerCategory::HttpV1);
    }

    #[test]
    fn queue_batch_by_first_record_source() {
        let event = json!({"Records": [
            {"messageId": "m1", "eventSource": "aws:sqs"},
            {"messageId": "m2", "eventSource": "aws:sqs"}
        ]});
        assert_eq!(classify(&event), TriggerCategory::QueueBatch);
    }

    #[test]
    fn empty_records_is_unclassified() {
        let event = json!({"Records": []});
        assert_eq!(classify(&event), TriggerCategory::Unclassified);
    }

    #[test]
    fn records_not_an_array_is_unclassified() {
        let event = json!({"Records": {"eventSource": "aws:sqs"}});
        assert_eq!(classify(&event), TriggerCategory::Unclassified);
    }

    #[test]
    fn only_first_record_is_probed() {
        let event = json!({"Records": [
            {"eventSource": "aws:sns"},
            {"eventSource": "aws:sqs"}
        ]});
        assert_eq!(classify(&event), TriggerCategory::Unclassified);
    }

    #[test]
    fn scheduled_event_is_unclassified() {
        let event = json!({"source": "aws.events", "detail-type": "Scheduled Event"});
        assert_eq!(classify(&event), TriggerCategory::Unclassified);
        assert_eq!(event_source(&event), EventSource::Scheduled);
    }

    #[test]
    fn non_object_documents_are_unclassified() {
        assert_eq!(classify(&json!(null)), TriggerCategory::Unclassified);
        assert_eq!(classify(&json!([1, 2, 3])), TriggerCategory::Unclassified);
        assert_eq!(classify(&json!("text")), TriggerCategory::Unclassified);
    }

    #[test]
    fn event_source_labels() {
        let sns = json!({"Records": [{"EventSource": "aws:sns", "Sns": {}}]});
        assert_eq!(event_source(&sns), EventSource::Notification);

        let s3 = json!({"Records": [{"eventSource": "aws:s3", "s3": {}}]});
        assert_eq!(event_source(&s3), EventSource::Storage);

        let kinesis = json!({"Records": [{"eventSource": "aws:kinesis"}]});
        assert_eq!(event_source(&kinesis), EventSource::Stream);

        let ddb = json!({"Records": [{"eventSource": "aws:dynamodb"}]});
        assert_eq!(event_source(&ddb), EventSource::Table);

        assert_eq!(event_source(&json!({"foo": 1})), EventSource::Unknown);
    }

    #[test]
    fn category_display() {
        assert_eq!(TriggerCategory::QueueBatch.to_string(), "queue-batch");
        assert_eq!(TriggerCategory::HttpV1.to_string(), "http-v1");
    }
}
