use std::time::Duration;

use sketchform_core::error::CoreError;

/// Errors from fetching region data. None of them are fatal: the cache
/// downgrades every variant to fallback or empty data.
#[derive(Debug, thiserror::Error)]
pub enum RegionFetchError {
    /// No response within the configured timeout.
    #[error("Region request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Region request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The region API returned a non-2xx status code.
    #[error("Region API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The region id cannot name an upstream list. Rejected before any
    /// request is made.
    #[error("Invalid region id: {0:?}")]
    InvalidId(String),

    /// The payload was not a recognised region list.
    #[error("Malformed region payload: {0}")]
    Parse(String),
}

impl From<CoreError> for RegionFetchError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Parse(msg) => RegionFetchError::Parse(msg),
            other => RegionFetchError::Parse(other.to_string()),
        }
    }
}
