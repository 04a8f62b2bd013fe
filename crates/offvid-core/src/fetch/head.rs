//! HEAD probe used to decide whether the network is reachable.

use std::time::Duration;

use super::FetchError;

/// Performs a HEAD request against `url` with a short overall timeout and
/// returns the final status code.
///
/// Only transport failures are errors: any HTTP response, even a 405 from a
/// server that blocks HEAD, means the network is up.
pub fn probe(url: &str, timeout: Duration) -> Result<u32, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?;
    easy.follow_location(true)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;
    easy.perform()?;
    Ok(easy.response_code()?)
}
