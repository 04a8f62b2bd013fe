//! On-disk layout: names, version, and the upgrade step.

use sqlx::{Pool, Sqlite};

use crate::error::OfflineError;

/// Default database name; the file is `<name>.db` under the state dir.
pub const DATABASE_NAME: &str = "example-database";

/// Schema version stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// The single record collection.
pub const COLLECTION: &str = "example_video";

/// Record key type.
pub type RecordKey = i64;

/// Fixed key the video payload lives under.
pub const VIDEO_KEY: RecordKey = 1;

/// Bring a freshly opened database up to `SCHEMA_VERSION`.
///
/// Version 0 means the file was just created: define the record collection and
/// stamp the version. A version newer than ours is refused.
pub(crate) async fn upgrade(pool: &Pool<Sqlite>) -> Result<(), OfflineError> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| OfflineError::StoreUnavailable(format!("read schema version: {e}")))?;

    if version > SCHEMA_VERSION {
        return Err(OfflineError::StoreUnavailable(format!(
            "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    if version == SCHEMA_VERSION {
        return Ok(());
    }

    tracing::info!(from = version, to = SCHEMA_VERSION, "upgrading store schema");
    let unavailable = |e: sqlx::Error| OfflineError::StoreUnavailable(format!("schema upgrade: {e}"));

    let mut tx = pool.begin().await.map_err(unavailable)?;
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {COLLECTION} (
            key INTEGER PRIMARY KEY,
            value BLOB NOT NULL
        )"
    ))
    .execute(&mut *tx)
    .await
    .map_err(unavailable)?;
    sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .execute(&mut *tx)
        .await
        .map_err(unavailable)?;
    tx.commit().await.map_err(unavailable)?;

    Ok(())
}
