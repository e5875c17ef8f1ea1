//! Fully decoded Bybit frames.

use super::op::OpEvent;
use super::types::{BookEvent, KLineEvent, OrderEvent, WalletEvent};

// Design: one enum for everything a connection can deliver, so a single channel
// carries acknowledgements and data in arrival order. Consumer pattern-matches.

/// A frame after discrimination, validation and payload decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Validated control acknowledgement (ping/pong/auth/subscribe)
    Ack(OpEvent),
    Book(BookEvent),
    KLine(KLineEvent),
    Order(Vec<OrderEvent>),
    Wallet(Vec<WalletEvent>),
}

impl StreamEvent {
    /// Symbol for market topics; account topics and acks have none.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            StreamEvent::Book(book) => Some(&book.symbol),
            StreamEvent::KLine(kline) => Some(&kline.symbol),
            StreamEvent::Ack(_) | StreamEvent::Order(_) | StreamEvent::Wallet(_) => None,
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, StreamEvent::Ack(_))
    }

    pub fn is_book(&self) -> bool {
        matches!(self, StreamEvent::Book(_))
    }

    pub fn is_kline(&self) -> bool {
        matches!(self, StreamEvent::KLine(_))
    }

    pub fn is_order(&self) -> bool {
        matches!(self, StreamEvent::Order(_))
    }

    pub fn is_wallet(&self) -> bool {
        matches!(self, StreamEvent::Wallet(_))
    }

    pub fn as_ack(&self) -> Option<&OpEvent> {
        match self {
            StreamEvent::Ack(ack) => Some(ack),
            _ => None,
        }
    }

    pub fn as_book(&self) -> Option<&BookEvent> {
        match self {
            StreamEvent::Book(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_kline(&self) -> Option<&KLineEvent> {
        match self {
            StreamEvent::KLine(kline) => Some(kline),
            _ => None,
        }
    }

    pub fn as_orders(&self) -> Option<&[OrderEvent]> {
        match self {
            StreamEvent::Order(orders) => Some(orders),
            _ => None,
        }
    }

    pub fn as_wallets(&self) -> Option<&[WalletEvent]> {
        match self {
            StreamEvent::Wallet(wallets) => Some(wallets),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::providers::bybit::envelope::DataKind;
    use crate::market::providers::bybit::op::OpKind;

    #[test]
    fn test_symbol_and_type_checks() {
        let kline = StreamEvent::KLine(KLineEvent {
            symbol: "ETHUSDT".to_string(),
            kind: DataKind::Snapshot,
            candles: Vec::new(),
        });
        assert_eq!(kline.symbol(), Some("ETHUSDT"));
        assert!(kline.is_kline());
        assert!(!kline.is_book());
        assert!(kline.as_kline().is_some());
        assert!(kline.as_orders().is_none());

        let ack = StreamEvent::Ack(OpEvent {
            op: OpKind::Subscribe,
            success: true,
            ret_msg: String::new(),
            conn_id: "c".to_string(),
            req_id: Some("1".to_string()),
            args: Vec::new(),
        });
        assert!(ack.is_ack());
        assert_eq!(ack.symbol(), None);
        assert_eq!(ack.as_ack().map(|a| &a.op), Some(&OpKind::Subscribe));

        let wallet = StreamEvent::Wallet(Vec::new());
        assert!(wallet.is_wallet());
        assert_eq!(wallet.as_wallets().map(<[WalletEvent]>::len), Some(0));
        assert!(!StreamEvent::Order(Vec::new()).is_wallet());
    }
}
