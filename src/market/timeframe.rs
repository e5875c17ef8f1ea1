//! Canonical candle intervals, independent of any exchange's interval codes.

use serde::{Deserialize, Serialize};

/// Represents the timeframe/interval of candlestick data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,   // 1 minute
    #[serde(rename = "3m")]
    M3,   // 3 minutes
    #[serde(rename = "5m")]
    M5,   // 5 minutes
    #[serde(rename = "15m")]
    M15,  // 15 minutes
    #[serde(rename = "30m")]
    M30,  // 30 minutes
    #[serde(rename = "1h")]
    H1,   // 1 hour
    #[serde(rename = "2h")]
    H2,   // 2 hours
    #[serde(rename = "4h")]
    H4,   // 4 hours
    #[serde(rename = "6h")]
    H6,   // 6 hours
    #[serde(rename = "12h")]
    H12,  // 12 hours
    #[serde(rename = "1d")]
    D1,   // 1 day
    #[serde(rename = "1w")]
    W1,   // 1 week
    #[serde(rename = "1mo")]
    Mo1,  // 1 month, bucketed as 30 days
}

impl Timeframe {
    /// All timeframes, shortest first
    pub const ALL: [Timeframe; 13] = [
        Timeframe::M1,
        Timeframe::M3,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H2,
        Timeframe::H4,
        Timeframe::H6,
        Timeframe::H12,
        Timeframe::D1,
        Timeframe::W1,
        Timeframe::Mo1,
    ];

    /// Returns the duration of this timeframe in seconds
    pub fn to_seconds(&self) -> u64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M3 => 3 * 60,
            Timeframe::M5 => 5 * 60,
            Timeframe::M15 => 15 * 60,
            Timeframe::M30 => 30 * 60,
            Timeframe::H1 => 60 * 60,
            Timeframe::H2 => 2 * 60 * 60,
            Timeframe::H4 => 4 * 60 * 60,
            Timeframe::H6 => 6 * 60 * 60,
            Timeframe::H12 => 12 * 60 * 60,
            Timeframe::D1 => 24 * 60 * 60,
            Timeframe::W1 => 7 * 24 * 60 * 60,
            Timeframe::Mo1 => 30 * 24 * 60 * 60,
        }
    }

    /// Returns the duration of this timeframe in minutes
    pub fn to_minutes(&self) -> u64 {
        self.to_seconds() / 60
    }

    /// Returns a human-readable string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M3 => "3m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H2 => "2h",
            Timeframe::H4 => "4h",
            Timeframe::H6 => "6h",
            Timeframe::H12 => "12h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "1w",
            Timeframe::Mo1 => "1mo",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
