//! CryptoCompare API client
//!
//! reqwest-backed [`Transport`] for the public min-API.
//!
//! # Example
//! ```no_run
//! use chrono::Utc;
//! use cryptocompare_candles::cryptocompare::{CryptoCompareClient, HourlyCandleQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CryptoCompareClient::new()?;
//!     let query = HourlyCandleQuery::new("BTC", "USD", 24, Utc::now());
//!     let (history, _meta) = client.histohour(Some(&query)).await?;
//!     println!("Fetched {} candles", history.data.len());
//!     Ok(())
//! }
//! ```

use std::future::Future;

use reqwest::{Client, Request, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{CandleResult, TransportError};
use super::history::fetch;
use super::query::{CandleQuery, Granularity, HourlyCandleQuery, MinuteCandleQuery};
use super::transport::{ResponseMeta, Transport};
use super::types::CandleResponse;
use crate::config::ClientConfig;

/// CryptoCompare HTTP client
#[derive(Debug, Clone)]
pub struct CryptoCompareClient {
    http_client: Client,
    base_url: Url,
}

impl CryptoCompareClient {
    /// Create a client against the public API with default settings
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http_client,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    /// Hourly candle history (`data/histohour`)
    pub async fn histohour(
        &self,
        query: Option<&HourlyCandleQuery>,
    ) -> CandleResult<(CandleResponse, ResponseMeta)> {
        fetch(self, query).await
    }

    /// Minute candle history (`data/histominute`)
    pub async fn histominute(
        &self,
        query: Option<&MinuteCandleQuery>,
    ) -> CandleResult<(CandleResponse, ResponseMeta)> {
        fetch(self, query).await
    }

    /// Candle history for any granularity
    pub async fn candles<G: Granularity>(
        &self,
        query: Option<&CandleQuery<G>>,
    ) -> CandleResult<(CandleResponse, ResponseMeta)> {
        fetch(self, query).await
    }
}

impl Transport for CryptoCompareClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn execute<T>(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<(T, ResponseMeta), TransportError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move {
            debug!("{} {}", request.method(), request.url());

            let response = self.http_client.execute(request).await?;
            let meta = ResponseMeta::from_response(&response);
            let body = response.text().await?;

            if !meta.status.is_success() {
                return Err(TransportError::Status { meta, body });
            }

            match serde_json::from_str(&body) {
                Ok(decoded) => Ok((decoded, meta)),
                Err(source) => Err(TransportError::Decode { meta, source }),
            }
        }
    }
}

/// Parse a base URL, making sure relative paths join underneath it
fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&normalized).map_err(|e| TransportError::InvalidUrl {
        path: base_url.to_string(),
        reason: e.to_string(),
    })
}
