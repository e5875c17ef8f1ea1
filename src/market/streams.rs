//! Stream types for WebSocket subscriptions.

use crate::market::timeframe::Timeframe;

/// Represents the data streams a connection can subscribe to.
/// Exchange-agnostic: each parser maps these to its own topic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    /// Candlestick/Kline data stream
    Candles { symbol: String, interval: Timeframe },
    /// Order book depth stream
    OrderBook { symbol: String, depth: u32 },
    /// Private order updates for the authenticated account
    Orders,
    /// Private wallet updates for the authenticated account
    Wallet,
}

impl Stream {
    /// Creates a new candles stream subscription.
    pub fn candles(symbol: impl Into<String>, interval: Timeframe) -> Self {
        Self::Candles {
            symbol: symbol.into(),
            interval,
        }
    }

    /// Creates a new order book stream subscription.
    pub fn order_book(symbol: impl Into<String>, depth: u32) -> Self {
        Self::OrderBook {
            symbol: symbol.into(),
            depth,
        }
    }

    /// Returns the symbol for market streams; account streams have none.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Stream::Candles { symbol, .. } => Some(symbol),
            Stream::OrderBook { symbol, .. } => Some(symbol),
            Stream::Orders | Stream::Wallet => None,
        }
    }

    /// Private streams need an authenticated connection.
    pub fn is_private(&self) -> bool {
        matches!(self, Stream::Orders | Stream::Wallet)
    }
}
