//! Custom serde helpers for Bitunix's loosely typed response fields.
//!
//! Bitunix reports integers and timestamps sometimes as JSON numbers and
//! sometimes as strings. The helpers buffer the field as a
//! [`serde_json::Value`], which keeps exact number text under the
//! `arbitrary_precision` feature, then parse it.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

/// Text of a scalar field, `None` for null or an empty string.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(de::Error::custom(format!(
            "expected a number or a string, got {other}"
        ))),
    }
}

/// Deserialize an optional value given either as a JSON number or a string.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use bitunix_api_client::types::serde_helpers::number_or_string;
///
/// #[derive(Deserialize, Debug)]
/// struct Response {
///     #[serde(deserialize_with = "number_or_string::deserialize", default)]
///     leverage: Option<u32>,
/// }
///
/// let response: Response = serde_json::from_str(r#"{"leverage":20}"#).unwrap();
/// assert_eq!(response.leverage, Some(20));
///
/// let response: Response = serde_json::from_str(r#"{"leverage":"20"}"#).unwrap();
/// assert_eq!(response.leverage, Some(20));
/// ```
pub mod number_or_string {
    use super::*;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        scalar_text(deserializer)?
            .map(|text| text.parse().map_err(de::Error::custom))
            .transpose()
    }
}

/// Deserialize an optional millisecond Unix timestamp, number or string.
pub mod millis_timestamp {
    use super::*;
    use time::OffsetDateTime;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = scalar_text(deserializer)? else {
            return Ok(None);
        };
        let millis: i128 = text.parse().map_err(de::Error::custom)?;
        let nanos = millis
            .checked_mul(1_000_000)
            .ok_or_else(|| de::Error::custom(format!("timestamp {text} out of range")))?;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map(Some)
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[derive(Deserialize, Debug, Default)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "number_or_string::deserialize")]
        total: Option<u64>,
        #[serde(deserialize_with = "millis_timestamp::deserialize")]
        ctime: Option<OffsetDateTime>,
    }

    #[test]
    fn test_number_and_string_agree() {
        let a: Sample = serde_json::from_str(r#"{"total":42,"ctime":1700000000000}"#).unwrap();
        let b: Sample = serde_json::from_str(r#"{"total":"42","ctime":"1700000000000"}"#).unwrap();

        assert_eq!(a.total, Some(42));
        assert_eq!(a.total, b.total);
        assert_eq!(a.ctime, b.ctime);
        assert_eq!(a.ctime.unwrap().unix_timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_missing_null_and_empty() {
        let missing: Sample = serde_json::from_str("{}").unwrap();
        assert!(missing.total.is_none());

        let null: Sample = serde_json::from_str(r#"{"total":null,"ctime":""}"#).unwrap();
        assert!(null.total.is_none());
        assert!(null.ctime.is_none());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Sample>(r#"{"total":"lots"}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"total":[1]}"#).is_err());
        assert!(
            serde_json::from_str::<Sample>(r#"{"ctime":"99999999999999999999999999999999999"}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<Sample>(r#"{"ctime":"-99999999999999999999"}"#).is_err());
    }
}
