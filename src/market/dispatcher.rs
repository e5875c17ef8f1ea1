//! Frame pump: decodes frames from a connection's read half and forwards the
//! results to a channel in arrival order.

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::market::message_parser::MessageParser;

const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
const DEFAULT_RAW_PREVIEW_BYTES: usize = 1024;

// Design: FramePump<P: MessageParser> is generic over the parser type.
// The connection owner keeps the socket (connect, auth, ping, reconnect) and
// hands the read half here. Decode failures are forwarded, not swallowed.

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PumpConfig {
    /// Capacity of the channel returned by [`FramePump::channel`]
    pub channel_capacity: usize,
    /// Bytes of a failed frame to include in the warning log
    pub raw_preview_bytes: usize,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            raw_preview_bytes: DEFAULT_RAW_PREVIEW_BYTES,
        }
    }
}

/// Why a pump run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// The frame stream ran out
    Exhausted,
    /// Peer sent a close frame
    Closed,
    /// The transport reported an error
    TransportError,
    /// Nobody is receiving anymore
    ReceiverDropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpSummary {
    /// Frames read from the stream, control frames included
    pub frames: u64,
    pub decoded: u64,
    pub failed: u64,
    /// Control frames not forwarded
    pub skipped: u64,
    pub exit: PumpExit,
}

pub struct FramePump<P: MessageParser> {
    parser: Arc<P>,
    config: PumpConfig,
}

impl<P: MessageParser> FramePump<P> {
    pub fn new(parser: P) -> Self {
        Self::with_config(parser, PumpConfig::default())
    }

    pub fn with_config(parser: P, config: PumpConfig) -> Self {
        Self {
            parser: Arc::new(parser),
            config,
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Channel sized from the config, for callers that don't bring their own.
    pub fn channel(&self) -> (mpsc::Sender<Result<P::Event>>, mpsc::Receiver<Result<P::Event>>) {
        mpsc::channel(self.config.channel_capacity.max(1))
    }

    /// Reads frames until the stream ends, closes or errors, or the receiver
    /// goes away. Text and binary frames are decoded and sent in order.
    pub async fn run<S>(&self, mut frames: S, sink: mpsc::Sender<Result<P::Event>>) -> PumpSummary
    where
        S: futures_util::Stream<Item = std::result::Result<Message, WsError>> + Unpin,
    {
        let name = self.parser.name();
        let mut summary = PumpSummary {
            frames: 0,
            decoded: 0,
            failed: 0,
            skipped: 0,
            exit: PumpExit::Exhausted,
        };
        info!(exchange = name, "frame pump started");

        while let Some(frame) = frames.next().await {
            summary.frames += 1;

            let result = match frame {
                Ok(Message::Text(text)) => self.decode(text.as_bytes()),
                Ok(Message::Binary(data)) => self.decode(&data),
                Ok(Message::Close(frame)) => {
                    info!(exchange = name, ?frame, "connection closed by peer");
                    summary.exit = PumpExit::Closed;
                    break;
                }
                // ping/pong replies are handled by tungstenite
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {
                    summary.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(exchange = name, error = %err, "websocket read failed");
                    summary.exit = PumpExit::TransportError;
                    break;
                }
            };

            match &result {
                Ok(_) => summary.decoded += 1,
                Err(_) => summary.failed += 1,
            }

            if sink.send(result).await.is_err() {
                debug!(exchange = name, "event receiver dropped");
                summary.exit = PumpExit::ReceiverDropped;
                break;
            }
        }

        info!(
            exchange = name,
            frames = summary.frames,
            decoded = summary.decoded,
            failed = summary.failed,
            skipped = summary.skipped,
            exit = ?summary.exit,
            "frame pump stopped"
        );
        summary
    }

    fn decode(&self, raw: &[u8]) -> Result<P::Event> {
        let result = self.parser.parse_message(raw);
        match &result {
            Ok(_) => debug!(exchange = self.parser.name(), bytes = raw.len(), "frame decoded"),
            Err(err) => {
                let preview =
                    truncate_for_log(&String::from_utf8_lossy(raw), self.config.raw_preview_bytes);
                warn!(
                    exchange = self.parser.name(),
                    error = %err,
                    bytes = raw.len(),
                    raw = %preview,
                    "frame decode failed"
                );
            }
        }
        result
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
