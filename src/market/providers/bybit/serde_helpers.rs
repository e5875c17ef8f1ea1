//! Field deserializers for Bybit's loosely typed numerics.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

// Bybit sends ids and timestamps as JSON numbers on some channels and as
// integer strings on others ("u": 18521288 vs "createdTime": "1672364262444").

pub fn deserialize_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_u64(&value).map_err(serde::de::Error::custom)
}

pub fn deserialize_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value_to_u64(&value).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Empty strings and nulls become zero; account records leave unused fields blank.
pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Decimal::ZERO);
    }

    if let Some(raw) = value.as_str() {
        if raw.trim().is_empty() {
            return Ok(Decimal::ZERO);
        }
        return Decimal::from_str(raw).map_err(serde::de::Error::custom);
    }

    if value.is_number() {
        return Decimal::from_str(&value.to_string()).map_err(serde::de::Error::custom);
    }

    Err(serde::de::Error::custom("invalid decimal value"))
}

fn value_to_u64(value: &Value) -> Result<u64, String> {
    if let Some(number) = value.as_u64() {
        return Ok(number);
    }

    if let Some(raw) = value.as_str() {
        return raw
            .trim()
            .parse::<u64>()
            .map_err(|err| format!("invalid integer string {raw:?}: {err}"));
    }

    Err(format!("expected integer or integer string, got {value}"))
}
