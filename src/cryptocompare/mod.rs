//! CryptoCompare historical OHLCV client
//!
//! Typed access to the `data/histohour` and `data/histominute` endpoints of
//! the CryptoCompare min-API. Both endpoints share one generic implementation
//! parameterized by [`Granularity`].
//!
//! # Quick Start
//!
//! ```no_run
//! use cryptocompare_candles::cryptocompare::{CryptoCompareClient, MinuteCandleQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CryptoCompareClient::new()?;
//!
//!     // Last 60 minutes of BTC/USD, anchored at a Unix timestamp
//!     let query = MinuteCandleQuery::new("BTC", "USD", 60, 1_609_459_200);
//!     let (history, meta) = client.histominute(Some(&query)).await?;
//!
//!     println!("{} -> {} candles", meta.status, history.data.len());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`query`]: Request parameters, limit clamping, query-string encoding
//! - [`types`]: Response envelope and candle records
//! - [`transport`]: The HTTP seam used by [`history::fetch`]
//! - [`client`]: reqwest implementation of the transport
//! - [`error`]: Transport and API error types

pub mod client;
pub mod error;
pub mod history;
pub mod query;
pub mod transport;
pub mod types;

pub use client::CryptoCompareClient;
pub use error::{CandleError, CandleResult, TransportError};
pub use history::fetch;
pub use query::{
    clamp_limit, CandleQuery, Granularity, Hour, HourlyCandleQuery, Minute, MinuteCandleQuery,
    DEFAULT_EXCHANGE, MAX_LIMIT, MIN_LIMIT,
};
pub use transport::{ResponseMeta, Transport};
pub use types::{Candle, CandleResponse};
