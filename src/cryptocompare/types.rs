//! CryptoCompare history response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status value of an error envelope
pub const RESPONSE_ERROR: &str = "Error";

/// Status value of a successful envelope
pub const RESPONSE_SUCCESS: &str = "Success";

/// Read an explicit JSON `null` as the field's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One OHLCV sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Candle {
    /// Bucket open time, Unix seconds
    #[serde(deserialize_with = "null_as_default")]
    pub time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub close: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub high: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub low: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub open: f64,
    /// Volume in the base asset
    #[serde(rename = "volumefrom", deserialize_with = "null_as_default")]
    pub volume_from: f64,
    /// Volume in the quote asset
    #[serde(rename = "volumeto", deserialize_with = "null_as_default")]
    pub volume_to: f64,
}

impl Candle {
    /// Bucket open time as a UTC datetime
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

/// Envelope returned by `data/histohour` and `data/histominute`
///
/// Error envelopes carry only `Response` and `Message`, so every field
/// falls back to its default when absent or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CandleResponse {
    /// "Success" or "Error"
    #[serde(deserialize_with = "null_as_default")]
    pub response: String,
    /// Error message, empty on success
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub aggregated: bool,
    /// Candles ordered oldest to newest
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<Candle>,
    #[serde(deserialize_with = "null_as_default")]
    pub time_to: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub time_from: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub first_value_in_array: bool,
    pub conversion_type: serde_json::Value,
}

impl CandleResponse {
    pub fn is_error(&self) -> bool {
        self.response == RESPONSE_ERROR
    }

    /// Covered range as (from, to) in Unix seconds
    pub fn time_range(&self) -> (i64, i64) {
        (self.time_from, self.time_to)
    }

    pub fn first(&self) -> Option<&Candle> {
        self.data.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.data.last()
    }
}
