//! Exchange-native payload shapes for the orderbook, kline, order and wallet topics.
//! Field names follow the Bybit V5 stream documentation.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::envelope::DataKind;
use super::serde_helpers;

/// One `[price, volume]` level as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel(
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
);

impl BookLevel {
    pub fn price(&self) -> Decimal {
        self.0
    }

    /// Zero volume on a delta means the level was removed.
    pub fn volume(&self) -> Decimal {
        self.1
    }
}

/// Order book snapshot or delta for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookEvent {
    pub symbol: String,
    /// Bid levels exactly as received; snapshots arrive sorted by price descending
    pub bids: Vec<BookLevel>,
    /// Ask levels exactly as received; snapshots arrive sorted by price ascending
    pub asks: Vec<BookLevel>,
    /// Per-symbol sequence. A value of 1 follows a service restart and is a full snapshot
    pub update_id: u64,
    /// Cross-topic sequence: smaller means generated earlier
    pub sequence_id: u64,
    /// Copied from the enclosing topic frame
    pub kind: DataKind,
}

impl BookEvent {
    /// `u == 1` is a forced resync, whatever `type` says.
    pub fn is_forced_snapshot(&self) -> bool {
        self.update_id == 1
    }

    /// True when a consumer must overwrite its local book instead of merging.
    pub fn replaces_local_book(&self) -> bool {
        self.kind == DataKind::Snapshot || self.is_forced_snapshot()
    }

    /// Whether this event was generated before another message with `sequence_id`.
    pub fn generated_before(&self, sequence_id: u64) -> bool {
        self.sequence_id < sequence_id
    }
}

/// Candles pushed on a kline topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KLineEvent {
    /// Copied from the topic
    pub symbol: String,
    /// Copied from the enclosing topic frame
    pub kind: DataKind,
    pub candles: Vec<Candle>,
}

/// A kline record as sent by the exchange.
///
/// While `confirmed` is false the candle is still open; later pushes for the same
/// `start_time` replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "start", deserialize_with = "serde_helpers::deserialize_u64")]
    pub start_time: u64,
    #[serde(rename = "end", deserialize_with = "serde_helpers::deserialize_u64")]
    pub end_time: u64,
    /// Exchange interval code ("1", "60", "D", ...)
    pub interval: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    /// Base asset volume
    #[serde(with = "rust_decimal::serde::str")]
    pub volume: Decimal,
    /// Quote asset volume
    #[serde(with = "rust_decimal::serde::str")]
    pub turnover: Decimal,
    #[serde(rename = "confirm")]
    pub confirmed: bool,
    /// Millisecond timestamp of the last trade in the candle
    #[serde(rename = "timestamp", deserialize_with = "serde_helpers::deserialize_u64")]
    pub last_trade_timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spot,
    Linear,
    Inverse,
    #[serde(rename = "option")]
    Options,
}

/// String-backed order enum. Values the exchange adds later decode as
/// `Unknown` with the raw string kept, so one new value never drops a record.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(raw) => raw,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(Side {
    Buy => "Buy",
    Sell => "Sell",
});

wire_enum!(
    /// Conditional and system orders may carry `UNKNOWN`, kept as `Unknown`.
    OrderType {
        Market => "Market",
        Limit => "Limit",
    }
);

wire_enum!(TimeInForce {
    Gtc => "GTC",
    Ioc => "IOC",
    Fok => "FOK",
    PostOnly => "PostOnly",
});

wire_enum!(OrderStatus {
    Created => "Created",
    New => "New",
    Rejected => "Rejected",
    PartiallyFilled => "PartiallyFilled",
    PartiallyFilledCanceled => "PartiallyFilledCanceled",
    Filled => "Filled",
    Cancelled => "Cancelled",
    Untriggered => "Untriggered",
    Triggered => "Triggered",
    Deactivated => "Deactivated",
    Active => "Active",
});

impl OrderStatus {
    /// No further updates will be pushed for the order.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected
                | OrderStatus::PartiallyFilledCanceled
                | OrderStatus::Filled
                | OrderStatus::Cancelled
                | OrderStatus::Deactivated
        )
    }
}

/// Order record as pushed on the private `order` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub order_link_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub order_status: OrderStatus,
    pub time_in_force: TimeInForce,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub qty: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub avg_price: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub leaves_qty: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub leaves_value: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub cum_exec_qty: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub cum_exec_value: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub cum_exec_fee: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub trigger_price: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub take_profit: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub stop_loss: Decimal,
    #[serde(default)]
    pub position_idx: u8,
    #[serde(default)]
    pub reduce_only: bool,
    #[serde(default)]
    pub close_on_trigger: bool,
    #[serde(default)]
    pub cancel_type: String,
    #[serde(default)]
    pub reject_reason: String,
    #[serde(default)]
    pub stop_order_type: String,
    #[serde(deserialize_with = "serde_helpers::deserialize_u64")]
    pub created_time: u64,
    #[serde(deserialize_with = "serde_helpers::deserialize_u64")]
    pub updated_time: u64,
}

/// Order record plus the product line it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    #[serde(flatten)]
    pub order: Order,
    pub category: Category,
}

/// Account snapshot pushed on the private `wallet` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletEvent {
    /// UNIFIED, CONTRACT or SPOT
    pub account_type: String,
    #[serde(
        rename = "accountIMRate",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub account_im_rate: Decimal,
    #[serde(
        rename = "accountMMRate",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub account_mm_rate: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub total_equity: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub total_wallet_balance: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub total_margin_balance: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub total_available_balance: Decimal,
    #[serde(
        rename = "totalPerpUPL",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub total_perp_upl: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub total_initial_margin: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub total_maintenance_margin: Decimal,
    #[serde(default)]
    pub coin: Vec<CoinBalance>,
}

impl WalletEvent {
    pub fn coin(&self, name: &str) -> Option<&CoinBalance> {
        self.coin.iter().find(|balance| balance.coin == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin: String,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub equity: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub usd_value: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub wallet_balance: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub available_to_withdraw: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub borrow_amount: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub accrued_interest: Decimal,
    #[serde(
        rename = "totalOrderIM",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub total_order_im: Decimal,
    #[serde(
        rename = "totalPositionIM",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub total_position_im: Decimal,
    #[serde(
        rename = "totalPositionMM",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero"
    )]
    pub total_position_mm: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub unrealised_pnl: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub cum_realised_pnl: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::deserialize_decimal_or_zero")]
    pub locked: Decimal,
    #[serde(default)]
    pub collateral_switch: bool,
    #[serde(default)]
    pub margin_collateral: bool,
}
