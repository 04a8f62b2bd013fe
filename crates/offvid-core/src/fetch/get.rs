//! Whole-body HTTP GET into memory.

use super::{check_status, FetchError, FetchOptions};

/// Downloads `url` with a single GET and returns the body.
pub fn get_bytes(url: &str, opts: &FetchOptions) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    opts.apply(&mut easy)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    check_status(easy.response_code()?)?;
    tracing::debug!(url, bytes = body.len(), "GET complete");
    Ok(body)
}

/// Async wrapper: runs [`get_bytes`] on the blocking pool.
pub async fn fetch_bytes(url: &str, opts: FetchOptions) -> Result<Vec<u8>, FetchError> {
    tokio::task::spawn_blocking({
        let url = url.to_string();
        move || get_bytes(&url, &opts)
    })
    .await?
}
