//! Download pipeline: fetch the video and persist it under the fixed key.

use crate::error::OfflineError;
use crate::fetch::{self, FetchOptions};
use crate::store::{VideoStore, VIDEO_KEY};

/// Fetches `url` and stores the body as the video record, replacing any
/// previous one. Returns the number of bytes stored.
///
/// Nothing is written if the fetch fails. No retry.
pub async fn download_video(
    store: &VideoStore,
    url: &str,
    opts: FetchOptions,
) -> Result<u64, OfflineError> {
    tracing::info!(url, "downloading video");
    let body = fetch::fetch_bytes(url, opts).await?;
    tracing::info!(url, bytes = body.len(), "downloaded video");

    store.put(VIDEO_KEY, &body).await?;
    tracing::info!(bytes = body.len(), "saved video");

    Ok(body.len() as u64)
}
