//! Candle history fetch
//!
//! One GET per call, no retries. Dropping the returned future cancels the
//! in-flight request; timeouts belong to the transport.

use reqwest::Method;
use tracing::{debug, warn};

use super::error::{CandleError, CandleResult};
use super::query::{CandleQuery, Granularity};
use super::transport::{ResponseMeta, Transport};
use super::types::CandleResponse;

/// Fetch candle history for granularity `G`.
///
/// Without a query the bare endpoint path is requested and the server applies
/// its own defaults. An envelope reporting `"Response": "Error"` is turned into
/// [`CandleError::Api`] and its data discarded.
pub async fn fetch<G, T>(
    transport: &T,
    query: Option<&CandleQuery<G>>,
) -> CandleResult<(CandleResponse, ResponseMeta)>
where
    G: Granularity,
    T: Transport,
{
    let path = match query {
        Some(query) => query.encode(G::BASE_PATH)?,
        None => G::BASE_PATH.to_string(),
    };

    debug!("Fetching {} candles: {}", G::NAME, path);

    let request = transport.build_request(Method::GET, &path)?;
    let (response, meta): (CandleResponse, ResponseMeta) = transport.execute(request).await?;

    if response.is_error() {
        warn!(
            "CryptoCompare rejected {} request ({}): {}",
            G::NAME,
            meta.status,
            response.message
        );
        return Err(CandleError::Api {
            message: response.message,
            meta,
        });
    }

    debug!(
        "Received {} {} candles ({} -> {})",
        response.data.len(),
        G::NAME,
        response.time_from,
        response.time_to
    );

    Ok((response, meta))
}
