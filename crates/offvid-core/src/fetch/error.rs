//! Fetch error type; converted into `OfflineError::NetworkError` by callers.

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection refused, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The blocking fetch task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
