//! Bybit topic naming: `<type>.<param>.<symbol>`, e.g. `orderbook.50.BTCUSDT`.
//! Private topics are a single segment (`order`, `wallet`).

use std::fmt;

use crate::error::{Result, StreamError};

pub const TOPIC_SEPARATOR: &str = ".";

/// First segment of a topic, used to pick a payload decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicType {
    OrderBook,
    Wallet,
    Order,
    KLine,
    /// Anything else, including the empty string
    Unknown(String),
}

impl TopicType {
    pub fn as_str(&self) -> &str {
        match self {
            TopicType::OrderBook => "orderbook",
            TopicType::Wallet => "wallet",
            TopicType::Order => "order",
            TopicType::KLine => "kline",
            TopicType::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TopicType::Unknown(_))
    }
}

impl From<&str> for TopicType {
    fn from(segment: &str) -> Self {
        match segment {
            "orderbook" => TopicType::OrderBook,
            "wallet" => TopicType::Wallet,
            "order" => TopicType::Order,
            "kline" => TopicType::KLine,
            other => TopicType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TopicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins any displayable parts with `.`.
pub fn build_topic(parts: &[&dyn fmt::Display]) -> String {
    parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(TOPIC_SEPARATOR)
}

/// Type of a topic, from its first segment. An empty topic is `Unknown("")`.
pub fn topic_type(topic: &str) -> TopicType {
    TopicType::from(topic.split(TOPIC_SEPARATOR).next().unwrap_or_default())
}

/// Instrument symbol of a three segment topic.
pub fn symbol_from_topic(topic: &str) -> Result<&str> {
    let segments: Vec<&str> = topic.split(TOPIC_SEPARATOR).collect();
    match segments.as_slice() {
        [_, _, symbol] => Ok(*symbol),
        _ => Err(StreamError::InvalidTopicFormat {
            topic: topic.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("orderbook.1.BTCUSDT", TopicType::OrderBook)]
    #[case("kline.5.ETHUSDT", TopicType::KLine)]
    #[case("order", TopicType::Order)]
    #[case("wallet", TopicType::Wallet)]
    #[case("publicTrade.BTCUSDT", TopicType::Unknown("publicTrade".to_string()))]
    #[case("", TopicType::Unknown(String::new()))]
    fn test_topic_type(#[case] topic: &str, #[case] expected: TopicType) {
        assert_eq!(topic_type(topic), expected);
    }

    #[test]
    fn test_empty_topic_is_unknown() {
        let kind = topic_type("");
        assert!(!kind.is_known());
        assert_eq!(kind.as_str(), "");
    }

    #[rstest]
    #[case("orderbook.1.BTCUSDT", "BTCUSDT")]
    #[case("kline.D.SOLUSDT", "SOLUSDT")]
    #[case("orderbook.50.", "")]
    fn test_symbol_from_topic(#[case] topic: &str, #[case] symbol: &str) {
        assert_eq!(symbol_from_topic(topic).unwrap(), symbol);
    }

    #[rstest]
    #[case("orderbook.BTCUSDT")]
    #[case("order")]
    #[case("")]
    #[case("kline.5.BTCUSDT.extra")]
    fn test_symbol_from_topic_wrong_segment_count(#[case] topic: &str) {
        match symbol_from_topic(topic) {
            Err(StreamError::InvalidTopicFormat { topic: reported }) => assert_eq!(reported, topic),
            other => panic!("expected InvalidTopicFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_build_topic_round_trip() {
        let topic = build_topic(&[&"orderbook", &1, &"BTCUSDT"]);
        assert_eq!(topic, "orderbook.1.BTCUSDT");
        assert_eq!(topic_type(&topic), TopicType::OrderBook);
        assert_eq!(symbol_from_topic(&topic).unwrap(), "BTCUSDT");
    }

    #[test]
    fn test_build_topic_accepts_topic_type() {
        let topic = build_topic(&[&TopicType::KLine, &"60", &"ETHUSDT"]);
        assert_eq!(topic, "kline.60.ETHUSDT");
        assert_eq!(build_topic(&[&TopicType::Wallet]), "wallet");
        assert_eq!(build_topic(&[]), "");
    }
}
