//! `VideoStore`: lazily-opened handle plus record get/put.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::schema::{self, RecordKey, COLLECTION};
use crate::error::OfflineError;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

struct Inner {
    location: Location,
    pool: OnceCell<Pool<Sqlite>>,
    opens: AtomicUsize,
}

/// Handle to the on-device video database.
///
/// Constructing a store does no I/O. The first operation opens the database;
/// later ones reuse the same pool. Clones share the handle.
#[derive(Clone)]
pub struct VideoStore {
    inner: Arc<Inner>,
}

impl VideoStore {
    fn new(location: Location) -> Self {
        VideoStore {
            inner: Arc::new(Inner {
                location,
                pool: OnceCell::new(),
                opens: AtomicUsize::new(0),
            }),
        }
    }

    /// Store named `name` under the XDG state directory:
    /// `~/.local/state/offvid/<name>.db` on Debian.
    pub fn open_default(name: &str) -> Result<Self, OfflineError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("offvid")
            .map_err(|e| OfflineError::StoreUnavailable(format!("state dir: {e}")))?;
        let db_path = xdg_dirs.get_state_home().join(format!("{name}.db"));
        Ok(Self::at(db_path))
    }

    /// Store backed by a specific file. Parent dirs are created on open.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self::new(Location::File(path.as_ref().to_path_buf()))
    }

    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Location::Memory)
    }

    /// Database file path, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.inner.location {
            Location::File(p) => Some(p),
            Location::Memory => None,
        }
    }

    /// Number of underlying opens performed so far.
    pub fn open_count(&self) -> usize {
        self.inner.opens.load(Ordering::SeqCst)
    }

    /// Open (or create) the database and run the schema upgrade, once.
    ///
    /// Concurrent callers wait on the same in-flight open and all receive the
    /// same pool. A failed open is not cached.
    pub async fn initialize(&self) -> Result<&Pool<Sqlite>, OfflineError> {
        self.inner.pool.get_or_try_init(|| self.open()).await
    }

    async fn open(&self) -> Result<Pool<Sqlite>, OfflineError> {
        self.inner.opens.fetch_add(1, Ordering::SeqCst);

        let pool = match &self.inner.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        OfflineError::StoreUnavailable(format!("create {}: {e}", parent.display()))
                    })?;
                }
                let uri = path_to_sqlite_uri(path) + "?mode=rwc";
                SqlitePoolOptions::new()
                    .max_connections(8)
                    .connect(&uri)
                    .await
                    .map_err(|e| {
                        OfflineError::StoreUnavailable(format!("open {}: {e}", path.display()))
                    })?
            }
            // Single connection that never expires, otherwise the pool would
            // hand back a different empty database.
            Location::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| OfflineError::StoreUnavailable(format!("open in-memory: {e}")))?,
        };

        schema::upgrade(&pool).await?;
        tracing::info!(location = ?self.inner.location, "store initialized");
        Ok(pool)
    }

    /// Write `bytes` under `key`, replacing any existing value.
    pub async fn put(&self, key: RecordKey, bytes: &[u8]) -> Result<(), OfflineError> {
        let pool = self.initialize().await?;
        sqlx::query(&format!(
            "INSERT INTO {COLLECTION} (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value"
        ))
        .bind(key)
        .bind(bytes)
        .execute(pool)
        .await
        .map_err(OfflineError::StoreWriteError)?;

        tracing::debug!(key, bytes = bytes.len(), "record written");
        Ok(())
    }

    /// Read the value under `key`; `None` when no record exists.
    pub async fn get(&self, key: RecordKey) -> Result<Option<Vec<u8>>, OfflineError> {
        let pool = self.initialize().await?;
        let value: Option<Vec<u8>> =
            sqlx::query_scalar(&format!("SELECT value FROM {COLLECTION} WHERE key = ?1"))
                .bind(key)
                .fetch_optional(pool)
                .await
                .map_err(OfflineError::StoreReadError)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_uri_escapes_special_chars() {
        let uri = path_to_sqlite_uri(Path::new("/tmp/my videos/a#b?.db"));
        assert_eq!(uri, "sqlite:///tmp/my%20videos/a%23b%3F.db");
    }

    #[test]
    fn constructors_do_no_io() {
        let store = VideoStore::at("/nonexistent/dir/offvid.db");
        assert_eq!(store.open_count(), 0);
        assert_eq!(store.path(), Some(Path::new("/nonexistent/dir/offvid.db")));
        assert!(VideoStore::in_memory().path().is_none());
    }
}
