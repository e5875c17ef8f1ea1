//! Error types for frame classification and decoding.
//! Every variant keeps the offending input so callers can log or alert on it.

use thiserror::Error;

use crate::market::providers::bybit::op::OpEvent;
use crate::market::providers::bybit::types::Candle;
use crate::market::timeframe::Timeframe;

// Nothing in this crate retries. A frame either decodes into a complete typed
// event or the call fails with one of these; reconnect and resubscribe policy
// belongs to whoever owns the socket.

/// Main error type for stream decoding
#[derive(Error, Debug)]
pub enum StreamError {
    /// Frame is not valid JSON, or is not exactly one of op / topic
    #[error("malformed envelope ({reason}): {raw}")]
    MalformedEnvelope { reason: String, raw: String },

    /// Op acknowledgement carries an op type we do not know
    #[error("unexpected op type: {event:?}")]
    UnrecognizedOperation { event: Box<OpEvent> },

    /// Op acknowledgement does not match the success criteria of its op type
    #[error("unexpected response result: {event:?}")]
    OpValidationFailed { event: Box<OpEvent> },

    /// Topic does not split into `<type>.<param>.<symbol>`
    #[error("unexpected topic: {topic}")]
    InvalidTopicFormat { topic: String },

    /// Topic type has no payload decoder
    #[error("unsupported topic type: {topic}")]
    UnsupportedTopic { topic: String },

    /// Topic payload does not match the shape expected for its topic type
    #[error("failed to decode {target} payload: {source}")]
    PayloadDecode {
        target: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Exchange interval code has no canonical timeframe
    #[error("unexpected kline interval {interval:?}: {candle:?}")]
    UnknownInterval { interval: String, candle: Box<Candle> },

    /// Canonical timeframe has no exchange interval code
    #[error("timeframe {interval} has no exchange interval code")]
    UnsupportedInterval { interval: Timeframe },

    /// Millisecond timestamp cannot be represented as a UTC date time
    #[error("{field} timestamp out of range: {millis}")]
    InvalidTimestamp { field: &'static str, millis: u64 },
}

impl StreamError {
    /// Build a malformed-envelope error, keeping the raw frame as (lossy) text.
    pub fn malformed(reason: impl Into<String>, raw: &[u8]) -> Self {
        StreamError::MalformedEnvelope {
            reason: reason.into(),
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Check if the error came from a control-channel acknowledgement
    pub fn is_op_error(&self) -> bool {
        matches!(
            self,
            StreamError::UnrecognizedOperation { .. } | StreamError::OpValidationFailed { .. }
        )
    }

    /// Raw wire text attached to the error, when the error carries one
    pub fn raw_input(&self) -> Option<&str> {
        match self {
            StreamError::MalformedEnvelope { raw, .. } => Some(raw),
            StreamError::PayloadDecode { raw, .. } => Some(raw),
            StreamError::InvalidTopicFormat { topic } => Some(topic),
            StreamError::UnsupportedTopic { topic } => Some(topic),
            _ => None,
        }
    }
}

/// Result type alias for stream decoding
pub type Result<T> = std::result::Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::providers::bybit::op::OpKind;

    fn ping_event() -> OpEvent {
        OpEvent {
            op: OpKind::Ping,
            success: true,
            ret_msg: "wrong".to_string(),
            conn_id: "conn-1".to_string(),
            req_id: None,
            args: Vec::new(),
        }
    }

    #[test]
    fn test_malformed_keeps_raw_frame() {
        let err = StreamError::malformed("neither op nor topic", br#"{"foo":1}"#);
        assert_eq!(err.raw_input(), Some(r#"{"foo":1}"#));
        assert!(err.to_string().contains("neither op nor topic"));
    }

    #[test]
    fn test_op_errors_are_flagged() {
        let err = StreamError::OpValidationFailed {
            event: Box::new(ping_event()),
        };
        assert!(err.is_op_error());
        assert!(err.to_string().contains("wrong"));

        let err = StreamError::InvalidTopicFormat {
            topic: "orderbook.BTCUSDT".to_string(),
        };
        assert!(!err.is_op_error());
        assert_eq!(err.raw_input(), Some("orderbook.BTCUSDT"));
    }

    #[test]
    fn test_payload_decode_exposes_source() {
        let source = serde_json::from_str::<u64>("\"x\"").unwrap_err();
        let err = StreamError::PayloadDecode {
            target: "orderbook",
            raw: "\"x\"".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("failed to decode orderbook payload"));
    }
}
