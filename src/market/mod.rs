//! Market data module for exchange streams.

pub mod dispatcher;
pub mod market_data;
pub mod message_parser;
pub mod providers;
pub mod streams;
pub mod timeframe;

// Re-exports for convenience
pub use dispatcher::{FramePump, PumpConfig, PumpExit, PumpSummary};
pub use market_data::{
    KLine,
    MarketData,
    OrderBookSnapshot,
    OrderBookUpdate,
    PriceLevel,
};
pub use message_parser::MessageParser;
pub use streams::Stream;
pub use timeframe::Timeframe;

// Re-export provider convenience types
pub use providers::bybit::{BybitParser, DomainAdapter, IntervalTable, StreamEvent};

/// Pump wired to the Bybit parser.
pub type BybitPump = FramePump<BybitParser>;

pub fn new_bybit_pump() -> BybitPump {
    FramePump::new(BybitParser::default())
}
