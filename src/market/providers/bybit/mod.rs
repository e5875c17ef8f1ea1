//! Bybit V5 stream decoding.
//!
//! Frames go through three steps: the envelope decides whether a frame is an
//! op acknowledgement or a topic push, acks are validated against their op
//! type, and topic payloads are decoded by topic type. [`DomainAdapter`] then
//! turns market topics into the canonical types in [`crate::market`].

pub mod adapter;
pub mod decode;
pub mod envelope;
pub mod event;
pub mod op;
pub mod serde_helpers;
pub mod topic;
pub mod types;

use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, StreamError};
use crate::market::message_parser::MessageParser;
use crate::market::streams::Stream;

pub use adapter::{BYBIT_INTERVALS, DomainAdapter, IntervalTable};
pub use decode::decode_topic;
pub use envelope::{DataKind, EventEnvelope, TopicEvent};
pub use event::StreamEvent;
pub use op::{OpEvent, OpKind};
pub use topic::{TopicType, build_topic, symbol_from_topic, topic_type};

pub const BYBIT_WSS_PUBLIC_SPOT_ENDPOINT: &str = "wss://stream.bybit.com/v5/public/spot";
pub const BYBIT_WSS_PUBLIC_LINEAR_ENDPOINT: &str = "wss://stream.bybit.com/v5/public/linear";
pub const BYBIT_WSS_PUBLIC_INVERSE_ENDPOINT: &str = "wss://stream.bybit.com/v5/public/inverse";
pub const BYBIT_WSS_PRIVATE_ENDPOINT: &str = "wss://stream.bybit.com/v5/private";

/// Bybit-specific message parser.
/// Implements MessageParser to turn Bybit frames into [`StreamEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct BybitParser {
    intervals: Arc<IntervalTable>,
}

impl BybitParser {
    pub fn new(intervals: Arc<IntervalTable>) -> Self {
        Self { intervals }
    }

    /// Adapter sharing this parser's interval table.
    pub fn adapter(&self) -> DomainAdapter {
        DomainAdapter::new(Arc::clone(&self.intervals))
    }

    /// Endpoint a stream has to be subscribed on.
    pub fn endpoint_for(stream: &Stream) -> &'static str {
        if stream.is_private() {
            BYBIT_WSS_PRIVATE_ENDPOINT
        } else {
            BYBIT_WSS_PUBLIC_LINEAR_ENDPOINT
        }
    }
}

impl MessageParser for BybitParser {
    type Event = StreamEvent;

    fn name(&self) -> &'static str {
        "Bybit"
    }

    fn topic(&self, stream: &Stream) -> Result<String> {
        let topic = match stream {
            Stream::Candles { symbol, interval } => {
                let code = self
                    .intervals
                    .exchange_code(*interval)
                    .ok_or(StreamError::UnsupportedInterval { interval: *interval })?;
                build_topic(&[&TopicType::KLine, &code, symbol])
            }
            Stream::OrderBook { symbol, depth } => {
                build_topic(&[&TopicType::OrderBook, depth, symbol])
            }
            Stream::Orders => TopicType::Order.to_string(),
            Stream::Wallet => TopicType::Wallet.to_string(),
        };
        Ok(topic)
    }

    fn parse_message(&self, raw: &[u8]) -> Result<StreamEvent> {
        match EventEnvelope::decode(raw)? {
            EventEnvelope::Op(event) => {
                event.validate()?;
                trace!(op = %event.op, conn_id = %event.conn_id, "op acknowledged");
                Ok(StreamEvent::Ack(event))
            }
            EventEnvelope::Topic(event) => decode_topic(&event),
        }
    }
}
