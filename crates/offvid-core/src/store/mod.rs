//! Persistent local video store (SQLite via sqlx).
//!
//! One database, one record collection, one fixed-key binary record holding
//! the downloaded video. The database is opened lazily on first use and the
//! open is memoized, so every operation can simply await `initialize()`.

mod db;
mod schema;

pub use db::VideoStore;
pub use schema::{RecordKey, COLLECTION, DATABASE_NAME, SCHEMA_VERSION, VIDEO_KEY};
