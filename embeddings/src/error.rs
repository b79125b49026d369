//! Errors raised while embedding passages or searching an index.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The remote provider has no API key.
    #[error("embedding provider not configured")]
    ProviderNotConfigured,

    #[error("embedding request failed: {0}")]
    ApiRequest(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The embedding backend did not answer in time.
    #[error("embedding backend timed out")]
    Timeout,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Nothing to index.
    #[error("cannot build an index from empty input")]
    EmptyInput,

    #[error("http error: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmbeddingError::Timeout
        } else {
            EmbeddingError::Http(err)
        }
    }
}
