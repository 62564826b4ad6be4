//! NDBC client error types.

/// Errors that can occur when talking to the NDBC data service.
///
/// The cache treats every variant as transient: the refresh or lookup is
/// retried on the next cycle or the next read.
#[derive(Debug, thiserror::Error)]
pub enum NdbcError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The station has no realtime data file upstream
    #[error("station {0} not found upstream")]
    NotFound(String),

    /// Rate limited by the server
    #[error("rate limited by NDBC")]
    RateLimited,

    /// Server returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The call did not complete within the configured timeout
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Local mock data could not be loaded
    #[error("mock data error: {message}")]
    Mock { message: String },
}
