//! Network fetch over libcurl.
//!
//! `get_bytes` downloads a whole body into memory (the video payload and cached
//! assets); `probe` issues a HEAD request for the connectivity signal. Both run
//! in the current thread; call from `spawn_blocking` if used from async code.

mod error;
mod get;
mod head;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::FetchError;
pub use get::{fetch_bytes, get_bytes};
pub use head::probe;

/// Transfer limits applied to every easy handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    pub connect_timeout_secs: u64,
    /// Upper bound on the whole transfer.
    pub timeout_secs: u64,
    pub max_redirections: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            max_redirections: 10,
        }
    }
}

impl FetchOptions {
    fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(Duration::from_secs(self.connect_timeout_secs))?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        easy.timeout(Duration::from_secs(self.timeout_secs))?;
        Ok(())
    }
}

fn check_status(code: u32) -> Result<(), FetchError> {
    if (200..300).contains(&code) {
        Ok(())
    } else {
        Err(FetchError::Http(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_2xx_is_http_error() {
        assert!(check_status(200).is_ok());
        assert!(check_status(206).is_ok());
        assert!(matches!(check_status(404), Err(FetchError::Http(404))));
        assert!(matches!(check_status(500), Err(FetchError::Http(500))));
        assert!(matches!(check_status(301), Err(FetchError::Http(301))));
    }

    #[test]
    fn fetch_options_toml_roundtrip() {
        let opts = FetchOptions::default();
        let s = toml::to_string(&opts).unwrap();
        let parsed: FetchOptions = toml::from_str(&s).unwrap();
        assert_eq!(parsed, opts);
    }
}
