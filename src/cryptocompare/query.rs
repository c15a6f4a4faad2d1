//! Candle history query construction and encoding
//!
//! A [`CandleQuery`] is parameterized by a [`Granularity`], which fixes the
//! endpoint path and the type used for the `toTs` anchor:
//!
//! - [`Hour`]: `data/histohour`, anchored at a `DateTime<Utc>`
//! - [`Minute`]: `data/histominute`, anchored at raw Unix seconds
//!
//! # Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use cryptocompare_candles::cryptocompare::HourlyCandleQuery;
//!
//! let anchor = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
//! let query = HourlyCandleQuery::new("BTC", "USD", 5000, anchor);
//! assert_eq!(query.limit(), 2000);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use super::error::TransportError;

/// Aggregated market index used when no exchange is specified
pub const DEFAULT_EXCHANGE: &str = "CCCAGG";

/// Smallest limit the API accepts
pub const MIN_LIMIT: u32 = 1;

/// Largest limit the API accepts
pub const MAX_LIMIT: u32 = 2000;

/// Time resolution of a candle history endpoint
pub trait Granularity {
    /// Endpoint path relative to the API base URL
    const BASE_PATH: &'static str;

    /// Short name used in log output
    const NAME: &'static str;

    /// Representation of the `toTs` anchor for this resolution
    type Anchor: Clone + fmt::Debug + PartialEq + Send + Sync;

    /// Unix seconds of the anchor
    fn anchor_seconds(anchor: &Self::Anchor) -> i64;
}

/// Hourly candles (`data/histohour`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hour;

impl Granularity for Hour {
    const BASE_PATH: &'static str = "data/histohour";
    const NAME: &'static str = "hour";

    type Anchor = DateTime<Utc>;

    fn anchor_seconds(anchor: &Self::Anchor) -> i64 {
        anchor.timestamp()
    }
}

/// Minute candles (`data/histominute`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Minute;

impl Granularity for Minute {
    const BASE_PATH: &'static str = "data/histominute";
    const NAME: &'static str = "minute";

    type Anchor = i64;

    fn anchor_seconds(anchor: &Self::Anchor) -> i64 {
        *anchor
    }
}

/// Bound a requested sample count to `[MIN_LIMIT, MAX_LIMIT]`.
///
/// Out-of-range values are corrected, never rejected.
pub fn clamp_limit(limit: i64) -> u32 {
    limit.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as u32
}

/// Parameters of a single candle history request
#[derive(Debug, Clone, PartialEq)]
pub struct CandleQuery<G: Granularity> {
    fsym: String,
    tsym: String,
    exchange: String,
    extra_params: String,
    sign: bool,
    try_conversion: bool,
    // Reserved by the API, never sent
    aggregate: u32,
    limit: u32,
    to_ts: G::Anchor,
    _granularity: PhantomData<G>,
}

pub type HourlyCandleQuery = CandleQuery<Hour>;
pub type MinuteCandleQuery = CandleQuery<Minute>;

impl<G: Granularity> CandleQuery<G> {
    /// Create a query with API defaults and a clamped limit
    ///
    /// # Arguments
    /// * `fsym` - Base symbol (e.g., "BTC"), passed through verbatim
    /// * `tsym` - Quote symbol (e.g., "USD"), passed through verbatim
    /// * `limit` - Requested number of candles, clamped to [1, 2000]
    /// * `to_ts` - Anchor from which history is fetched backward
    pub fn new(
        fsym: impl Into<String>,
        tsym: impl Into<String>,
        limit: i64,
        to_ts: G::Anchor,
    ) -> Self {
        Self {
            fsym: fsym.into(),
            tsym: tsym.into(),
            exchange: DEFAULT_EXCHANGE.to_string(),
            extra_params: String::new(),
            sign: false,
            try_conversion: true,
            aggregate: 1,
            limit: clamp_limit(limit),
            to_ts,
            _granularity: PhantomData,
        }
    }

    /// Set the application name reported to the API
    pub fn with_extra_params(mut self, extra_params: impl Into<String>) -> Self {
        self.extra_params = extra_params.into();
        self
    }

    /// Query a single exchange instead of the aggregate index
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    /// Ask the server to sign the response
    pub fn with_sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    /// Allow conversion through an intermediate currency when no direct pair exists
    pub fn with_try_conversion(mut self, try_conversion: bool) -> Self {
        self.try_conversion = try_conversion;
        self
    }

    pub fn fsym(&self) -> &str {
        &self.fsym
    }

    pub fn tsym(&self) -> &str {
        &self.tsym
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn extra_params(&self) -> &str {
        &self.extra_params
    }

    pub fn sign(&self) -> bool {
        self.sign
    }

    pub fn try_conversion(&self) -> bool {
        self.try_conversion
    }

    pub fn aggregate(&self) -> u32 {
        self.aggregate
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn to_ts(&self) -> &G::Anchor {
        &self.to_ts
    }

    /// Query parameters in key order, following the inclusion rules of the API
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();

        if !self.fsym.is_empty() {
            params.insert("fsym", self.fsym.clone());
        }
        if !self.tsym.is_empty() {
            params.insert("tsym", self.tsym.clone());
        }
        if !self.exchange.is_empty() {
            params.insert("e", self.exchange.clone());
        }
        if !self.extra_params.is_empty() {
            params.insert("extraParams", self.extra_params.clone());
        }

        params.insert("sign", self.sign.to_string());
        params.insert("tryConversion", self.try_conversion.to_string());
        params.insert("limit", self.limit.to_string());

        // 0 is a valid anchor; anything earlier means "unset"
        let to_ts = G::anchor_seconds(&self.to_ts);
        if to_ts >= 0 {
            params.insert("toTs", to_ts.to_string());
        }

        params
    }

    /// Render `base_path?query` with keys in lexicographic order
    pub fn encode(&self, base_path: &str) -> Result<String, TransportError> {
        let query = serde_urlencoded::to_string(self.params())?;
        Ok(format!("{}?{}", base_path, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    }

    fn decode(encoded: &str) -> HashMap<String, String> {
        let (_, query) = encoded.split_once('?').expect("query separator");
        serde_urlencoded::from_str(query).unwrap()
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(i64::MIN), 1);
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(24), 24);
        assert_eq!(clamp_limit(2000), 2000);
        assert_eq!(clamp_limit(2001), 2000);
        assert_eq!(clamp_limit(i64::MAX), 2000);
    }

    #[test]
    fn test_new_applies_defaults() {
        let query = HourlyCandleQuery::new("BTC", "USD", 24, anchor());

        assert_eq!(query.fsym(), "BTC");
        assert_eq!(query.tsym(), "USD");
        assert_eq!(query.exchange(), DEFAULT_EXCHANGE);
        assert_eq!(query.extra_params(), "");
        assert!(!query.sign());
        assert!(query.try_conversion());
        assert_eq!(query.aggregate(), 1);
        assert_eq!(query.limit(), 24);
        assert_eq!(*query.to_ts(), anchor());
    }

    #[test]
    fn test_new_clamps_limit() {
        assert_eq!(HourlyCandleQuery::new("BTC", "USD", 5000, anchor()).limit(), 2000);
        assert_eq!(HourlyCandleQuery::new("BTC", "USD", 0, anchor()).limit(), 1);
        assert_eq!(MinuteCandleQuery::new("BTC", "USD", -10, 0).limit(), 1);
    }

    #[test]
    fn test_symbols_pass_through_verbatim() {
        let query = MinuteCandleQuery::new("btc", "Usd", 10, 0);
        let params = decode(&query.encode(Minute::BASE_PATH).unwrap());
        assert_eq!(params["fsym"], "btc");
        assert_eq!(params["tsym"], "Usd");
    }

    #[test]
    fn test_encode_hourly_full_parameter_set() {
        let query = HourlyCandleQuery::new("BTC", "USD", 24, anchor()).with_extra_params("my-app");
        let encoded = query.encode(Hour::BASE_PATH).unwrap();

        assert!(encoded.starts_with("data/histohour?"));
        assert_eq!(
            encoded,
            "data/histohour?e=CCCAGG&extraParams=my-app&fsym=BTC&limit=24\
             &sign=false&toTs=1609459200&tryConversion=true&tsym=USD"
        );
    }

    #[test]
    fn test_encode_round_trip_matches_inclusion_rules() {
        let query = MinuteCandleQuery::new("ETH", "EUR", 100, 1_609_459_200)
            .with_exchange("Kraken")
            .with_sign(true)
            .with_try_conversion(false);
        let params = decode(&query.encode(Minute::BASE_PATH).unwrap());

        let expected: HashMap<String, String> = [
            ("fsym", "ETH"),
            ("tsym", "EUR"),
            ("e", "Kraken"),
            ("sign", "true"),
            ("tryConversion", "false"),
            ("limit", "100"),
            ("toTs", "1609459200"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(params, expected);
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let query = MinuteCandleQuery::new("", "", 10, 0).with_exchange("");
        let params = decode(&query.encode(Minute::BASE_PATH).unwrap());

        assert!(!params.contains_key("fsym"));
        assert!(!params.contains_key("tsym"));
        assert!(!params.contains_key("e"));
        assert!(!params.contains_key("extraParams"));
        assert_eq!(params["sign"], "false");
        assert_eq!(params["tryConversion"], "true");
        assert_eq!(params["limit"], "10");
    }

    #[test]
    fn test_minute_anchor_boundary() {
        let at_zero = decode(&MinuteCandleQuery::new("BTC", "USD", 10, 0).encode("p").unwrap());
        assert_eq!(at_zero["toTs"], "0");

        let before_zero =
            decode(&MinuteCandleQuery::new("BTC", "USD", 10, -1).encode("p").unwrap());
        assert!(!before_zero.contains_key("toTs"));
    }

    #[test]
    fn test_hourly_anchor_boundary() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let at_epoch = decode(&HourlyCandleQuery::new("BTC", "USD", 10, epoch).encode("p").unwrap());
        assert_eq!(at_epoch["toTs"], "0");

        let unset = HourlyCandleQuery::new("BTC", "USD", 10, DateTime::<Utc>::MIN_UTC);
        assert!(!decode(&unset.encode("p").unwrap()).contains_key("toTs"));
    }

    #[test]
    fn test_values_are_form_encoded() {
        let query = MinuteCandleQuery::new("BTC", "USD", 10, 0).with_extra_params("my app&co");
        let encoded = query.encode(Minute::BASE_PATH).unwrap();

        assert!(encoded.contains("extraParams=my+app%26co"));
        assert_eq!(decode(&encoded)["extraParams"], "my app&co");
    }

    #[test]
    fn test_granularity_paths() {
        assert_eq!(Hour::BASE_PATH, "data/histohour");
        assert_eq!(Minute::BASE_PATH, "data/histominute");
    }
}
