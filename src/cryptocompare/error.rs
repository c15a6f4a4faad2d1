//! CryptoCompare client error types

use thiserror::Error;

use super::transport::ResponseMeta;

/// Failure inside the HTTP layer: building, sending, or decoding a request.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request URL for path '{path}': {reason}")]
    InvalidUrl { path: String, reason: String },

    #[error("failed to encode query parameters: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}", status = .meta.status)]
    Status { meta: ResponseMeta, body: String },

    #[error("failed to decode response body: {source}")]
    Decode {
        meta: ResponseMeta,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// Metadata of the HTTP response, if one was received before the failure
    pub fn response_meta(&self) -> Option<&ResponseMeta> {
        match self {
            Self::Status { meta, .. } | Self::Decode { meta, .. } => Some(meta),
            _ => None,
        }
    }
}

/// Error returned by a candle history fetch.
#[derive(Debug, Error)]
pub enum CandleError {
    /// Transport failure, passed through unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Well-formed envelope with `"Response": "Error"`
    #[error("{message}")]
    Api { message: String, meta: ResponseMeta },
}

impl CandleError {
    pub fn response_meta(&self) -> Option<&ResponseMeta> {
        match self {
            Self::Transport(err) => err.response_meta(),
            Self::Api { meta, .. } => Some(meta),
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

pub type CandleResult<T> = Result<T, CandleError>;
