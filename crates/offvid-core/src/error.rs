//! Error taxonomy surfaced to the user-facing commands.
//!
//! Store and playback operations return [`OfflineError`]; the CLI prints it as
//! a single blocking alert. Simple absence of a record is not an error.

use crate::fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    /// The database could not be opened or created (storage disabled, permission
    /// denied, unknown schema version).
    #[error("local store unavailable: {0}")]
    StoreUnavailable(String),

    /// I/O failure while reading a record.
    #[error("failed to read from local store")]
    StoreReadError(#[source] sqlx::Error),

    /// I/O failure while writing a record.
    #[error("failed to write to local store")]
    StoreWriteError(#[source] sqlx::Error),

    /// Playback was requested before anything was downloaded.
    #[error("no downloaded video found. Have you downloaded the video?")]
    NothingDownloaded,

    /// Fetching the payload failed.
    #[error("network error")]
    NetworkError(#[from] FetchError),

    /// The playback file could not be materialized.
    #[error("failed to prepare playback source: {0}")]
    Playback(#[source] std::io::Error),
}

impl OfflineError {
    /// Short machine-friendly name; `offvid` logs it as the `kind` field of a failed command.
    pub fn kind(&self) -> &'static str {
        match self {
            OfflineError::StoreUnavailable(_) => "store_unavailable",
            OfflineError::StoreReadError(_) => "store_read",
            OfflineError::StoreWriteError(_) => "store_write",
            OfflineError::NothingDownloaded => "nothing_downloaded",
            OfflineError::NetworkError(_) => "network",
            OfflineError::Playback(_) => "playback",
        }
    }
}
