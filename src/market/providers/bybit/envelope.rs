//! Classifies each raw frame as either a control acknowledgement or a data topic.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::op::{OpEvent, OpKind};
use super::serde_helpers;
use super::topic::{TopicType, symbol_from_topic, topic_type};
use crate::error::{Result, StreamError};

/// Whether a topic frame replaces state or amends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Snapshot,
    Delta,
}

/// Data-bearing frame. The payload stays raw until a topic decoder claims it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEvent {
    pub topic: String,
    pub kind: DataKind,
    /// Millisecond epoch at which the exchange generated the data
    pub timestamp: u64,
    pub raw_payload: String,
}

impl TopicEvent {
    pub fn topic_type(&self) -> TopicType {
        topic_type(&self.topic)
    }

    pub fn symbol(&self) -> Result<&str> {
        symbol_from_topic(&self.topic)
    }
}

/// A frame is exactly one of these; there is no way to build both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEnvelope {
    Op(OpEvent),
    Topic(TopicEvent),
}

// Every field of both shapes is optional on the wire. A shape counts as present
// when any one of its fields is, so a frame mixing the two is caught instead of
// being routed by whichever field happens to be checked first.
#[derive(Debug, Deserialize)]
struct WireFrame {
    success: Option<bool>,
    ret_msg: Option<String>,
    req_id: Option<String>,
    conn_id: Option<String>,
    op: Option<OpKind>,
    args: Option<Vec<String>>,

    topic: Option<String>,
    #[serde(rename = "type")]
    kind: Option<DataKind>,
    // private topics stamp frames with `creationTime` instead of `ts`
    #[serde(
        default,
        alias = "creationTime",
        deserialize_with = "serde_helpers::deserialize_opt_u64"
    )]
    ts: Option<u64>,
    data: Option<Box<RawValue>>,
}

impl WireFrame {
    fn has_op_fields(&self) -> bool {
        self.success.is_some()
            || self.ret_msg.is_some()
            || self.req_id.is_some()
            || self.conn_id.is_some()
            || self.op.is_some()
            || self.args.is_some()
    }

    fn has_topic_fields(&self) -> bool {
        self.topic.is_some() || self.kind.is_some() || self.ts.is_some() || self.data.is_some()
    }

    fn into_op(self) -> OpEvent {
        OpEvent {
            op: self.op.unwrap_or_else(|| OpKind::Unknown(String::new())),
            success: self.success.unwrap_or_default(),
            ret_msg: self.ret_msg.unwrap_or_default(),
            conn_id: self.conn_id.unwrap_or_default(),
            req_id: self.req_id,
            args: self.args.unwrap_or_default(),
        }
    }

    fn into_topic(self, raw: &[u8]) -> Result<TopicEvent> {
        let topic = self
            .topic
            .ok_or_else(|| StreamError::malformed("topic frame without topic", raw))?;
        let data = self
            .data
            .ok_or_else(|| StreamError::malformed("topic frame without data", raw))?;
        let timestamp = self
            .ts
            .ok_or_else(|| StreamError::malformed("topic frame without timestamp", raw))?;

        // private pushes omit `type`; each one carries complete records
        let kind = match (self.kind, topic_type(&topic)) {
            (Some(kind), _) => kind,
            (None, TopicType::Order | TopicType::Wallet) => DataKind::Snapshot,
            (None, _) => return Err(StreamError::malformed("topic frame without type", raw)),
        };

        Ok(TopicEvent {
            topic,
            kind,
            timestamp,
            raw_payload: data.get().to_string(),
        })
    }
}

impl EventEnvelope {
    /// Decodes a raw frame, failing unless exactly one shape is populated.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let wire: WireFrame = serde_json::from_slice(raw)
            .map_err(|err| StreamError::malformed(err.to_string(), raw))?;

        match (wire.has_op_fields(), wire.has_topic_fields()) {
            (true, false) => Ok(EventEnvelope::Op(wire.into_op())),
            (false, true) => wire.into_topic(raw).map(EventEnvelope::Topic),
            (true, true) => Err(StreamError::malformed(
                "frame carries both op and topic fields",
                raw,
            )),
            (false, false) => Err(StreamError::malformed(
                "frame carries neither op nor topic fields",
                raw,
            )),
        }
    }

    pub fn is_op(&self) -> bool {
        matches!(self, EventEnvelope::Op(_))
    }

    pub fn is_topic(&self) -> bool {
        matches!(self, EventEnvelope::Topic(_))
    }

    pub fn as_op(&self) -> Option<&OpEvent> {
        match self {
            EventEnvelope::Op(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_topic(&self) -> Option<&TopicEvent> {
        match self {
            EventEnvelope::Topic(event) => Some(event),
            _ => None,
        }
    }
}

impl FromStr for EventEnvelope {
    type Err = StreamError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::decode(raw.as_bytes())
    }
}
