//! Converts Bybit payloads into the canonical market data types.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::event::StreamEvent;
use super::types::{BookEvent, BookLevel, Candle};
use crate::error::{Result, StreamError};
use crate::market::market_data::{KLine, MarketData, OrderBookSnapshot, OrderBookUpdate, PriceLevel};
use crate::market::timeframe::Timeframe;

/// Bybit kline interval codes and the timeframe each one stands for.
pub const BYBIT_INTERVALS: [(&str, Timeframe); 13] = [
    ("1", Timeframe::M1),
    ("3", Timeframe::M3),
    ("5", Timeframe::M5),
    ("15", Timeframe::M15),
    ("30", Timeframe::M30),
    ("60", Timeframe::H1),
    ("120", Timeframe::H2),
    ("240", Timeframe::H4),
    ("360", Timeframe::H6),
    ("720", Timeframe::H12),
    ("D", Timeframe::D1),
    ("W", Timeframe::W1),
    ("M", Timeframe::Mo1),
];

/// Two-way mapping between exchange interval codes and canonical timeframes.
/// Built once and shared; it is never mutated after construction.
#[derive(Debug, Clone)]
pub struct IntervalTable {
    to_global: HashMap<String, Timeframe>,
    to_exchange: HashMap<Timeframe, String>,
}

impl IntervalTable {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, Timeframe)>) -> Self {
        let mut to_global = HashMap::new();
        let mut to_exchange = HashMap::new();
        for (code, timeframe) in entries {
            to_global.insert(code.to_string(), timeframe);
            to_exchange.insert(timeframe, code.to_string());
        }
        Self {
            to_global,
            to_exchange,
        }
    }

    pub fn bybit() -> Self {
        Self::new(BYBIT_INTERVALS)
    }

    pub fn to_global(&self, code: &str) -> Option<Timeframe> {
        self.to_global.get(code).copied()
    }

    pub fn exchange_code(&self, timeframe: Timeframe) -> Option<&str> {
        self.to_exchange.get(&timeframe).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.to_global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_global.is_empty()
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::bybit()
    }
}

pub(crate) fn millis_to_utc(field: &'static str, millis: u64) -> Result<DateTime<Utc>> {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or(StreamError::InvalidTimestamp { field, millis })
}

#[derive(Debug, Clone, Default)]
pub struct DomainAdapter {
    intervals: Arc<IntervalTable>,
}

impl DomainAdapter {
    pub fn new(intervals: Arc<IntervalTable>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &IntervalTable {
        &self.intervals
    }

    /// Fails on an interval code with no canonical timeframe rather than
    /// guessing the nearest one.
    pub fn to_global_candle(&self, candle: &Candle, symbol: &str) -> Result<KLine> {
        let interval = self.intervals.to_global(&candle.interval).ok_or_else(|| {
            StreamError::UnknownInterval {
                interval: candle.interval.clone(),
                candle: Box::new(candle.clone()),
            }
        })?;

        Ok(KLine {
            symbol: symbol.to_string(),
            interval,
            start_time: millis_to_utc("start", candle.start_time)?,
            end_time: millis_to_utc("end", candle.end_time)?,
            open: candle.open,
            close: candle.close,
            high: candle.high,
            low: candle.low,
            volume: candle.volume,
            quote_volume: candle.turnover,
            closed: candle.confirmed,
            last_trade_time: millis_to_utc("timestamp", candle.last_trade_timestamp)?,
        })
    }

    /// Copies symbol and levels verbatim. No re-sorting, no dedup.
    pub fn to_global_order_book(&self, book: &BookEvent) -> OrderBookSnapshot {
        let levels = |side: &[BookLevel]| -> Vec<PriceLevel> {
            side.iter()
                .map(|level| PriceLevel::new(level.price(), level.volume()))
                .collect()
        };

        OrderBookSnapshot {
            symbol: book.symbol.clone(),
            bids: levels(&book.bids),
            asks: levels(&book.asks),
        }
    }

    /// Canonical market data carried by a decoded event.
    ///
    /// Every candle in the frame converts or none is returned. Acks and account
    /// topics carry no market data and yield an empty list.
    pub fn to_market_data(&self, event: &StreamEvent) -> Result<Vec<MarketData>> {
        match event {
            StreamEvent::KLine(kline) => kline
                .candles
                .iter()
                .map(|candle| self.to_global_candle(candle, &kline.symbol).map(MarketData::Candle))
                .collect(),
            StreamEvent::Book(book) => {
                let snapshot = self.to_global_order_book(book);
                let update = if book.replaces_local_book() {
                    OrderBookUpdate::snapshot(snapshot, book.update_id)
                } else {
                    OrderBookUpdate::delta(snapshot, book.update_id)
                };
                Ok(vec![MarketData::OrderBook(update.with_sequence(book.sequence_id))])
            }
            StreamEvent::Ack(_) | StreamEvent::Order(_) | StreamEvent::Wallet(_) => Ok(Vec::new()),
        }
    }
}
