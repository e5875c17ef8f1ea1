//! Exchange provider implementations.

pub mod bybit;

// Re-export for convenience
pub use bybit::{BybitParser, DomainAdapter, IntervalTable, StreamEvent};
