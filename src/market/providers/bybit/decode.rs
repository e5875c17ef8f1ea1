//! Topic payload decoders, one per topic type.

use serde::Deserialize;
use serde::de::{self, DeserializeOwned};

use super::envelope::TopicEvent;
use super::event::StreamEvent;
use super::serde_helpers;
use super::topic::TopicType;
use super::types::{BookEvent, BookLevel, Candle, KLineEvent, OrderEvent, WalletEvent};
use crate::error::{Result, StreamError};

#[derive(Debug, Deserialize)]
struct BookPayload {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "b")]
    bids: Vec<BookLevel>,
    #[serde(rename = "a")]
    asks: Vec<BookLevel>,
    #[serde(rename = "u", deserialize_with = "serde_helpers::deserialize_u64")]
    update_id: u64,
    #[serde(rename = "seq", deserialize_with = "serde_helpers::deserialize_u64")]
    sequence_id: u64,
}

/// Routes a topic frame to the decoder for its topic type.
pub fn decode_topic(event: &TopicEvent) -> Result<StreamEvent> {
    match event.topic_type() {
        TopicType::OrderBook => decode_book(event).map(StreamEvent::Book),
        TopicType::KLine => decode_kline(event).map(StreamEvent::KLine),
        TopicType::Order => decode_orders(event).map(StreamEvent::Order),
        TopicType::Wallet => decode_wallets(event).map(StreamEvent::Wallet),
        TopicType::Unknown(_) => Err(StreamError::UnsupportedTopic {
            topic: event.topic.clone(),
        }),
    }
}

/// Levels keep wire order; nothing here re-sorts or dedups them.
pub fn decode_book(event: &TopicEvent) -> Result<BookEvent> {
    let payload: BookPayload = decode_payload(event, "orderbook")?;
    Ok(BookEvent {
        symbol: payload.symbol,
        bids: payload.bids,
        asks: payload.asks,
        update_id: payload.update_id,
        sequence_id: payload.sequence_id,
        kind: event.kind,
    })
}

pub fn decode_kline(event: &TopicEvent) -> Result<KLineEvent> {
    let symbol = event.symbol()?.to_string();
    let candles: Vec<Candle> = decode_payload(event, "kline")?;
    if candles.is_empty() {
        return Err(StreamError::PayloadDecode {
            target: "kline",
            raw: event.raw_payload.clone(),
            source: de::Error::invalid_length(0, &"at least one candle"),
        });
    }
    Ok(KLineEvent {
        symbol,
        kind: event.kind,
        candles,
    })
}

pub fn decode_orders(event: &TopicEvent) -> Result<Vec<OrderEvent>> {
    decode_payload(event, "order")
}

pub fn decode_wallets(event: &TopicEvent) -> Result<Vec<WalletEvent>> {
    decode_payload(event, "wallet")
}

fn decode_payload<T: DeserializeOwned>(event: &TopicEvent, target: &'static str) -> Result<T> {
    serde_json::from_str(&event.raw_payload).map_err(|source| StreamError::PayloadDecode {
        target,
        raw: event.raw_payload.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::providers::bybit::envelope::DataKind;
    use crate::market::providers::bybit::types::{Category, OrderStatus, Side, TimeInForce};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn topic_event(topic: &str, kind: DataKind, payload: &str) -> TopicEvent {
        TopicEvent {
            topic: topic.to_string(),
            kind,
            timestamp: 1_672_304_484_978,
            raw_payload: payload.to_string(),
        }
    }

    const CANDLES: &str = r#"[{"start":1672324800000,"end":1672325099999,"interval":"5","open":"16649.5","close":"16677","high":"16677","low":"16608","volume":"2.081","turnover":"34666.4005","confirm":false,"timestamp":1672324988882}]"#;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_decode_book_snapshot_preserves_wire_order() {
        let payload = r#"{"s":"BTCUSDT","b":[["16493.50","0.006"],["16493.00","0.100"]],"a":[["16611.00","0.029"],["16612.00","0.213"]],"u":18521288,"seq":7961638724}"#;
        let event = topic_event("orderbook.50.BTCUSDT", DataKind::Snapshot, payload);
        let book = decode_book(&event).unwrap();

        assert_eq!(book.symbol, "BTCUSDT");
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0], BookLevel(dec("16493.50"), dec("0.006")));
        assert_eq!(book.bids[1].price(), dec("16493.00"));
        assert_eq!(book.asks[0].price(), dec("16611.00"));
        assert_eq!(book.asks[1].volume(), dec("0.213"));
        assert_eq!(book.update_id, 18_521_288);
        assert_eq!(book.sequence_id, 7_961_638_724);
        assert_eq!(book.kind, DataKind::Snapshot);
    }

    #[test]
    fn test_decode_book_delta_is_not_resorted() {
        // deltas can list levels in any order; they must come out as they went in
        let payload = r#"{"s":"BTCUSDT","b":[["30247.20","30.028"],["30249.00","0"]],"a":[["30252.00","0"],["30248.70","0.001"]],"u":177400507,"seq":66544703342}"#;
        let event = topic_event("orderbook.50.BTCUSDT", DataKind::Delta, payload);
        let book = decode_book(&event).unwrap();

        let bid_prices: Vec<Decimal> = book.bids.iter().map(BookLevel::price).collect();
        let ask_prices: Vec<Decimal> = book.asks.iter().map(BookLevel::price).collect();
        assert_eq!(bid_prices, vec![dec("30247.20"), dec("30249.00")]);
        assert_eq!(ask_prices, vec![dec("30252.00"), dec("30248.70")]);
        assert_eq!(book.kind, DataKind::Delta);
        assert!(!book.replaces_local_book());
    }

    #[test]
    fn test_decode_book_update_id_as_string() {
        let payload = r#"{"s":"BTCUSDT","b":[],"a":[],"u":"1","seq":"100"}"#;
        let event = topic_event("orderbook.1.BTCUSDT", DataKind::Delta, payload);
        let book = decode_book(&event).unwrap();
        assert_eq!(book.update_id, 1);
        assert_eq!(book.sequence_id, 100);
        assert!(book.is_forced_snapshot());
        assert!(book.replaces_local_book());
    }

    #[test]
    fn test_decode_book_shape_mismatch() {
        let payload = r#"{"s":"BTCUSDT","b":[["1"]],"a":[],"u":1,"seq":1}"#;
        match decode_book(&topic_event("orderbook.1.BTCUSDT", DataKind::Snapshot, payload)) {
            Err(StreamError::PayloadDecode { target, raw, .. }) => {
                assert_eq!(target, "orderbook");
                assert_eq!(raw, payload);
            }
            other => panic!("expected PayloadDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_book_missing_sequence() {
        let payload = r#"{"s":"BTCUSDT","b":[],"a":[],"u":5}"#;
        let event = topic_event("orderbook.1.BTCUSDT", DataKind::Delta, payload);
        let err = decode_book(&event).unwrap_err();
        assert!(matches!(err, StreamError::PayloadDecode { .. }));
    }

    #[test]
    fn test_decode_kline() {
        let event = topic_event("kline.5.BTCUSDT", DataKind::Snapshot, CANDLES);
        let kline = decode_kline(&event).unwrap();

        assert_eq!(kline.symbol, "BTCUSDT");
        assert_eq!(kline.kind, DataKind::Snapshot);
        assert_eq!(kline.candles.len(), 1);

        let candle = &kline.candles[0];
        assert_eq!(candle.start_time, 1_672_324_800_000);
        assert_eq!(candle.end_time, 1_672_325_099_999);
        assert_eq!(candle.interval, "5");
        assert_eq!(candle.open, dec("16649.5"));
        assert_eq!(candle.close, dec("16677"));
        assert_eq!(candle.turnover, dec("34666.4005"));
        assert!(!candle.confirmed);
        assert_eq!(candle.last_trade_timestamp, 1_672_324_988_882);
    }

    #[test]
    fn test_decode_kline_needs_symbol_in_topic() {
        let event = topic_event("kline.BTCUSDT", DataKind::Snapshot, CANDLES);
        let err = decode_kline(&event).unwrap_err();
        assert!(matches!(err, StreamError::InvalidTopicFormat { .. }));
    }

    #[test]
    fn test_decode_kline_rejects_object_payload() {
        let event = topic_event("kline.5.BTCUSDT", DataKind::Snapshot, r#"{"start":1}"#);
        let err = decode_kline(&event).unwrap_err();
        assert!(matches!(err, StreamError::PayloadDecode { target: "kline", .. }));
    }

    #[test]
    fn test_decode_kline_rejects_empty_frame() {
        let event = topic_event("kline.5.BTCUSDT", DataKind::Snapshot, "[]");
        match decode_kline(&event) {
            Err(StreamError::PayloadDecode { target, raw, .. }) => {
                assert_eq!(target, "kline");
                assert_eq!(raw, "[]");
            }
            other => panic!("expected PayloadDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_orders() {
        let payload = r#"[{"symbol":"ETH-30DEC22-1400-C","orderId":"5cf98598-39a7-459e-97bf-76ca765ee020","side":"Sell","orderType":"Market","cancelType":"UNKNOWN","price":"72.5","qty":"1","orderIv":"","timeInForce":"IOC","orderStatus":"Filled","orderLinkId":"","lastPriceOnCreated":"","reduceOnly":false,"leavesQty":"","leavesValue":"","cumExecQty":"1","cumExecValue":"75","avgPrice":"75","blockTradeId":"","positionIdx":0,"cumExecFee":"0.358635","createdTime":"1672364262444","updatedTime":"1672364262457","rejectReason":"EC_NoError","stopOrderType":"","tpslMode":"","triggerPrice":"","takeProfit":"","stopLoss":"","tpTriggerBy":"","slTriggerBy":"","tpLimitPrice":"","slLimitPrice":"","triggerDirection":0,"triggerBy":"","closeOnTrigger":false,"category":"option","placeType":"price","smpType":"None","smpGroup":0,"smpOrderId":""}]"#;
        let event = topic_event("order", DataKind::Snapshot, payload);
        let orders = decode_orders(&event).unwrap();

        assert_eq!(orders.len(), 1);
        let event = &orders[0];
        assert_eq!(event.category, Category::Options);
        assert_eq!(event.order.order_id, "5cf98598-39a7-459e-97bf-76ca765ee020");
        assert_eq!(event.order.side, Side::Sell);
        assert_eq!(event.order.order_status, OrderStatus::Filled);
        assert_eq!(event.order.price, dec("72.5"));
        assert_eq!(event.order.leaves_qty, Decimal::ZERO);
        assert_eq!(event.order.cum_exec_fee, dec("0.358635"));
        assert_eq!(event.order.created_time, 1_672_364_262_444);
    }

    #[test]
    fn test_decode_orders_keeps_unlisted_enum_values() {
        let payload = r#"[{"symbol":"BTCUSDT","orderId":"1","side":"Buy","orderType":"Limit","timeInForce":"RPI","orderStatus":"New","createdTime":"1","updatedTime":"1","category":"spot"}]"#;
        let event = topic_event("order", DataKind::Snapshot, payload);
        let orders = decode_orders(&event).unwrap();

        assert_eq!(orders[0].order.time_in_force, TimeInForce::Unknown("RPI".to_string()));
        assert_eq!(orders[0].order.side, Side::Buy);
        assert!(orders[0].order.order_type.is_known());
    }

    #[test]
    fn test_decode_orders_missing_category() {
        let payload = r#"[{"symbol":"BTCUSDT","orderId":"1","side":"Buy","orderType":"Limit","timeInForce":"GTC","orderStatus":"New","createdTime":"1","updatedTime":"1"}]"#;
        let event = topic_event("order", DataKind::Snapshot, payload);
        let err = decode_orders(&event).unwrap_err();
        assert!(matches!(err, StreamError::PayloadDecode { target: "order", .. }));
    }

    #[test]
    fn test_decode_wallets() {
        let payload = r#"[{"accountIMRate":"0","accountMMRate":"0","totalEquity":"10262.91335023","totalWalletBalance":"9684.46297164","totalMarginBalance":"9684.46297164","totalAvailableBalance":"9556.6056547","totalPerpUPL":"0","totalInitialMargin":"0","totalMaintenanceMargin":"0","coin":[{"coin":"BTC","equity":"0.00102964","usdValue":"36.70759517","walletBalance":"0.00102964","availableToWithdraw":"0.00102964","availableToBorrow":"","borrowAmount":"0","accruedInterest":"0","totalOrderIM":"","totalPositionIM":"","totalPositionMM":"","unrealisedPnl":"0","cumRealisedPnl":"-0.00000973","bonus":"0","collateralSwitch":true,"marginCollateral":true,"locked":"0","spotHedgingQty":"0"}],"accountLMRate":"0","accountType":"UNIFIED"}]"#;
        let event = topic_event("wallet", DataKind::Snapshot, payload);
        let wallets = decode_wallets(&event).unwrap();

        assert_eq!(wallets.len(), 1);
        let wallet = &wallets[0];
        assert_eq!(wallet.account_type, "UNIFIED");
        assert_eq!(wallet.total_equity, dec("10262.91335023"));

        let btc = wallet.coin("BTC").unwrap();
        assert_eq!(btc.wallet_balance, dec("0.00102964"));
        assert_eq!(btc.total_order_im, Decimal::ZERO);
        assert_eq!(btc.cum_realised_pnl, dec("-0.00000973"));
        assert!(btc.collateral_switch);
        assert!(wallet.coin("ETH").is_none());
    }

    #[test]
    fn test_decode_topic_routes_by_type() {
        let event = topic_event("kline.5.BTCUSDT", DataKind::Delta, CANDLES);
        assert!(decode_topic(&event).unwrap().is_kline());

        let event = topic_event("wallet", DataKind::Snapshot, "[]");
        assert!(decode_topic(&event).unwrap().is_wallet());
    }

    #[test]
    fn test_decode_topic_unknown_type() {
        let event = topic_event("publicTrade.BTCUSDT", DataKind::Snapshot, "[]");
        match decode_topic(&event) {
            Err(StreamError::UnsupportedTopic { topic }) => {
                assert_eq!(topic, "publicTrade.BTCUSDT")
            }
            other => panic!("expected UnsupportedTopic, got {other:?}"),
        }
    }
}
