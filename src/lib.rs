//! CryptoCompare Candles
//!
//! Client library for CryptoCompare historical OHLCV data at hourly and
//! minute granularity.
//!
//! ```no_run
//! use chrono::Utc;
//! use cryptocompare_candles::{CryptoCompareClient, HourlyCandleQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CryptoCompareClient::new()?;
//!     let query = HourlyCandleQuery::new("ETH", "USD", 48, Utc::now());
//!     let (history, _) = client.histohour(Some(&query)).await?;
//!     for candle in &history.data {
//!         println!("{} close={}", candle.time, candle.close);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cryptocompare;
pub mod export;

pub use config::ClientConfig;

// Re-export the client surface for convenience
pub use cryptocompare::{
    Candle, CandleError, CandleQuery, CandleResponse, CryptoCompareClient, Hour,
    HourlyCandleQuery, Minute, MinuteCandleQuery,
};
