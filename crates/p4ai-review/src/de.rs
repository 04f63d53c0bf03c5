// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Tolerant field decoders for service responses
//!
//! Model-written responses carry `null`, floats and numeric strings where
//! the schema says string or integer; these decoders accept them.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Decode `null` as the field's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an integer from an integer, a float (floored), a numeric string
/// or `null` (0)
pub(crate) fn loose_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => Ok(n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().map_or(0, floor_to_i64))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(floor_to_i64)
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&s), &"a number")),
        other => Err(de::Error::custom(format!("expected a number, found {other}"))),
    }
}

/// Like [`loose_int`], with negative values read as 0
pub(crate) fn loose_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = loose_int(deserializer)?;
    Ok(u32::try_from(n.max(0)).unwrap_or(u32::MAX))
}

// `as` saturates at the i64 bounds and maps NaN to 0
#[allow(clippy::cast_possible_truncation)]
fn floor_to_i64(value: f64) -> i64 {
    value.floor() as i64
}
