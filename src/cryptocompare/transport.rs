//! HTTP transport seam
//!
//! History fetches only need two things from the HTTP layer: turning a
//! relative path into a request, and executing that request into a typed
//! body. [`Transport`] captures exactly that, so the reqwest client can be
//! swapped for an in-memory fixture in tests.

use std::future::Future;

use reqwest::header::HeaderMap;
use reqwest::{Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::error::TransportError;

/// Metadata of a received HTTP response
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub url: Url,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            url: response.url().clone(),
            headers: response.headers().clone(),
        }
    }
}

/// Executes requests against the API base URL.
///
/// Implementations must be safe to share between concurrent callers.
pub trait Transport: Sync {
    /// Base URL every request path is resolved against
    fn base_url(&self) -> &Url;

    /// Build a body-less request for `path`, relative to [`Transport::base_url`]
    fn build_request(&self, method: Method, path: &str) -> Result<Request, TransportError> {
        let url = self
            .base_url()
            .join(path)
            .map_err(|e| TransportError::InvalidUrl {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Request::new(method, url))
    }

    /// Send `request` and decode the response body as `T`
    fn execute<T>(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<(T, ResponseMeta), TransportError>> + Send
    where
        T: DeserializeOwned + Send;
}
