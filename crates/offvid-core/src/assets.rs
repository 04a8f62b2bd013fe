//! Background asset cache.
//!
//! Registered once at startup and left to run on its own: fetches each
//! configured asset URL into the cache directory unless it is already there.
//! It never touches the video store. Before the process exits the owner
//! gives it a bounded grace period via [`AssetWorker::settle`].

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

use crate::fetch::{self, FetchOptions};

/// Suffix for an asset that is still being written.
pub const TEMP_SUFFIX: &str = ".part";

/// Handle to the running cache worker.
pub struct AssetWorker {
    handle: JoinHandle<()>,
    cache_dir: PathBuf,
}

/// Spawn the cache worker.
pub fn register(assets: Vec<String>, cache_dir: PathBuf, opts: FetchOptions) -> AssetWorker {
    tracing::info!("asset cache worker registration in progress");
    let handle = tokio::spawn({
        let cache_dir = cache_dir.clone();
        async move {
            match cache_assets(&assets, &cache_dir, opts).await {
                Ok(fetched) => tracing::info!(
                    fetched,
                    total = assets.len(),
                    dir = %cache_dir.display(),
                    "asset cache worker registration complete"
                ),
                Err(e) => tracing::warn!("asset cache worker registration failure: {:#}", e),
            }
        }
    });
    AssetWorker { handle, cache_dir }
}

impl AssetWorker {
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Wait up to `grace` for the worker to finish. Returns true if it ran to
    /// the end (successfully or not).
    ///
    /// A worker still running after `grace` is aborted, logged as a
    /// registration failure, and any half-written asset is removed.
    pub async fn settle(self, grace: Duration) -> bool {
        let AssetWorker {
            mut handle,
            cache_dir,
        } = self;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!("asset cache worker registration failure: task failed: {}", e);
                false
            }
            Err(_) => {
                handle.abort();
                // Abort only takes effect once the task is polled again.
                let _ = handle.await;
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "asset cache worker registration failure: still running at exit, aborted"
                );
                match remove_partials(&cache_dir).await {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!(removed = n, "removed partial assets"),
                    Err(e) => tracing::warn!("could not clean partial assets: {:#}", e),
                }
                false
            }
        }
    }
}

/// Delete every `*.part` file left in `cache_dir`. Returns how many were removed.
pub async fn remove_partials(cache_dir: &Path) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(cache_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).with_context(|| format!("read {}", cache_dir.display())),
    };
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_name().to_string_lossy().ends_with(TEMP_SUFFIX) {
            continue;
        }
        let path = entry.path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
    Ok(removed)
}

/// Fetch every asset not yet present in `cache_dir`. Returns how many were fetched.
pub async fn cache_assets(assets: &[String], cache_dir: &Path, opts: FetchOptions) -> Result<usize> {
    tokio::fs::create_dir_all(cache_dir)
        .await
        .with_context(|| format!("create cache dir {}", cache_dir.display()))?;

    let mut fetched = 0;
    for asset in assets {
        let path = cache_dir.join(cache_file_name(asset)?);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(asset = %asset, "asset already cached");
            continue;
        }
        let body = fetch::fetch_bytes(asset, opts)
            .await
            .with_context(|| format!("fetch asset {asset}"))?;

        let mut temp = path.clone().into_os_string();
        temp.push(TEMP_SUFFIX);
        let temp = PathBuf::from(temp);
        tokio::fs::write(&temp, &body)
            .await
            .with_context(|| format!("write {}", temp.display()))?;
        tokio::fs::rename(&temp, &path)
            .await
            .with_context(|| format!("rename {} to {}", temp.display(), path.display()))?;
        tracing::debug!(asset = %asset, bytes = body.len(), "asset cached");
        fetched += 1;
    }
    Ok(fetched)
}

/// Flat, filesystem-safe name for an asset URL: `<host>[_<port>]_<path segments>`.
pub fn cache_file_name(asset: &str) -> Result<String> {
    let url = Url::parse(asset).with_context(|| format!("invalid asset URL: {asset}"))?;
    let host = match (url.host_str().unwrap_or("local"), url.port()) {
        (host, Some(port)) => format!("{host}_{port}"),
        (host, None) => host.to_string(),
    };
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..").collect())
        .unwrap_or_default();
    let path = if segments.is_empty() {
        "index".to_string()
    } else {
        segments.join("_")
    };
    let name: String = format!("{host}_{path}")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_file_name_flattens_path() {
        assert_eq!(
            cache_file_name("https://example.com/static/app.css").unwrap(),
            "example.com_static_app.css"
        );
        assert_eq!(cache_file_name("https://example.com/").unwrap(), "example.com_index");
        assert_eq!(
            cache_file_name("http://127.0.0.1:8080/a%20b/../c.js").unwrap(),
            "127.0.0.1_8080_c.js"
        );
    }

    #[test]
    fn cache_file_name_keeps_ports_apart() {
        let a = cache_file_name("http://h:8080/a.js").unwrap();
        let b = cache_file_name("http://h:9090/a.js").unwrap();
        assert_eq!(a, "h_8080_a.js");
        assert_eq!(b, "h_9090_a.js");
        // Default port is implicit.
        assert_eq!(cache_file_name("https://h:443/a.js").unwrap(), "h_a.js");
    }

    #[test]
    fn cache_file_name_rejects_garbage() {
        assert!(cache_file_name("not a url").is_err());
    }

    #[tokio::test]
    async fn already_cached_assets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let asset = "http://127.0.0.1:9/app.css".to_string();
        std::fs::write(dir.path().join(cache_file_name(&asset).unwrap()), b"body{}").unwrap();
        // Would fail to connect if it tried to fetch.
        let fetched = cache_assets(&[asset], dir.path(), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(fetched, 0);
    }

    #[tokio::test]
    async fn remove_partials_only_touches_part_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("h_app.css"), b"done").unwrap();
        std::fs::write(dir.path().join("h_app.js.part"), b"half").unwrap();
        assert_eq!(remove_partials(dir.path()).await.unwrap(), 1);
        assert!(dir.path().join("h_app.css").exists());
        assert!(!dir.path().join("h_app.js.part").exists());
        assert_eq!(remove_partials(&dir.path().join("missing")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn no_assets_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("assets");
        assert_eq!(cache_assets(&[], &cache, FetchOptions::default()).await.unwrap(), 0);
        assert!(cache.is_dir());
    }
}
