//! Bybit V5 WebSocket stream decoding.
//!
//! Classifies raw frames as op acknowledgements or topic pushes, validates the
//! acknowledgements, decodes topic payloads into typed events and converts
//! market topics into canonical market data.

pub mod error;
pub mod market;
pub mod notify;

pub use error::{Result, StreamError};
