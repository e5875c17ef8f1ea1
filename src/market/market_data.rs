//! Canonical market data types, independent of any exchange's wire format.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::market::timeframe::Timeframe;
use crate::notify::{Attachment, AttachmentField, HasAttachment};

// Prices and volumes are exact decimals end to end. Exchanges send them as
// strings and rounding through f64 would change the values a consumer sees.

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    pub price: Decimal,
    /// Zero on a delta means the level was removed
    pub volume: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, volume: Decimal) -> Self {
        Self { price, volume }
    }
}

/// Order book sides for one symbol, in the order the exchange sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBookSnapshot {
    pub symbol: String,
    /// Bid levels (buy orders), sorted by price descending on snapshots
    pub bids: Vec<PriceLevel>,
    /// Ask levels (sell orders), sorted by price ascending on snapshots
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    /// First bid level as received. Only the best bid on snapshot frames.
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }
}

impl HasAttachment for OrderBookSnapshot {
    fn attachment(&self) -> Attachment {
        let level = |side: Option<&PriceLevel>| {
            side.map(|l| format!("{} @ {}", l.volume, l.price))
                .unwrap_or_else(|| "-".to_string())
        };

        Attachment::new(format!("{} order book", self.symbol))
            .field(AttachmentField::short("Best bid", level(self.best_bid())))
            .field(AttachmentField::short("Best ask", level(self.best_ask())))
            .field(AttachmentField::short("Bid levels", self.bids.len().to_string()))
            .field(AttachmentField::short("Ask levels", self.asks.len().to_string()))
    }
}

/// Order book event with the metadata a consumer needs to keep a local book.
/// Design: the book has symbol baked in, updates are discrete events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBookUpdate {
    pub book: OrderBookSnapshot,
    /// True = overwrite local state, False = merge into it
    pub is_snapshot: bool,
    pub update_id: u64,
    // Option<T> because not all exchanges provide cross-topic sequence numbers
    pub sequence: Option<u64>,
}

impl OrderBookUpdate {
    pub fn snapshot(book: OrderBookSnapshot, update_id: u64) -> Self {
        Self {
            book,
            is_snapshot: true,
            update_id,
            sequence: None,
        }
    }

    pub fn delta(book: OrderBookSnapshot, update_id: u64) -> Self {
        Self {
            book,
            is_snapshot: false,
            update_id,
            sequence: None,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn symbol(&self) -> &str {
        &self.book.symbol
    }
}

/// A candle with its streaming context (symbol, interval, closed flag).
/// WARNING: If closed=false, the candle is still updating. Replace it on the
/// next push for the same start time instead of appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KLine {
    pub symbol: String,
    pub interval: Timeframe,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    /// Base asset volume
    pub volume: Decimal,
    /// Quote asset volume
    pub quote_volume: Decimal,
    pub closed: bool,
    pub last_trade_time: DateTime<Utc>,
}

impl KLine {
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}

impl HasAttachment for KLine {
    fn attachment(&self) -> Attachment {
        let color = if self.is_bullish() { "good" } else { "danger" };
        Attachment::new(format!("{} {}", self.symbol, self.interval))
            .color(color)
            .field(AttachmentField::short("Open", self.open.to_string()))
            .field(AttachmentField::short("Close", self.close.to_string()))
            .field(AttachmentField::short("High", self.high.to_string()))
            .field(AttachmentField::short("Low", self.low.to_string()))
            .field(AttachmentField::short("Volume", self.volume.to_string()))
            .field(AttachmentField::short(
                "Start",
                self.start_time.format("%Y-%m-%d %H:%M UTC").to_string(),
            ))
    }
}

/// Unified market data enum for all canonical stream types.
/// Allows a single channel to carry all types of market data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MarketData {
    Candle(KLine),
    OrderBook(OrderBookUpdate),
}

impl MarketData {
    pub fn symbol(&self) -> &str {
        match self {
            MarketData::Candle(kline) => &kline.symbol,
            MarketData::OrderBook(update) => update.symbol(),
        }
    }

    pub fn is_candle(&self) -> bool {
        matches!(self, MarketData::Candle(_))
    }

    pub fn is_order_book(&self) -> bool {
        matches!(self, MarketData::OrderBook(_))
    }

    pub fn as_candle(&self) -> Option<&KLine> {
        match self {
            MarketData::Candle(kline) => Some(kline),
            _ => None,
        }
    }

    pub fn as_order_book(&self) -> Option<&OrderBookUpdate> {
        match self {
            MarketData::OrderBook(update) => Some(update),
            _ => None,
        }
    }
}
