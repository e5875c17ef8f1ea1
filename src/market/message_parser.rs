//! MessageParser trait for exchange-specific message handling.

use crate::error::Result;
use crate::market::streams::Stream;

// This trait is the key abstraction that keeps FramePump exchange-agnostic.
// Each exchange implements the following methods, the pump handles everything else.
// Adding a new exchange = implement this trait, no changes to FramePump.
// =============================================================================

/// Trait for exchange-specific topic naming and frame decoding.
pub trait MessageParser: Send + Sync + 'static {
    /// Fully decoded frame, acknowledgements and data alike.
    type Event: Send + 'static;

    fn name(&self) -> &'static str;

    /// Exchange topic name for a subscription stream.
    fn topic(&self, stream: &Stream) -> Result<String>;

    /// Decodes one raw frame.
    /// A frame either decodes completely or fails; there is no partial event.
    fn parse_message(&self, raw: &[u8]) -> Result<Self::Event>;
}
