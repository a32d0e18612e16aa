//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection settings required by core behavior.
//!
//! # Invariants
//! - Open/configure failures surface as `DbError::StorageUnavailable`.
//! - Schema creation is left to the facade callbacks.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY_PATH: &str = ":memory:";

/// Opens (creating if needed) a SQLite database file.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", path.to_path_buf(), || Connection::open(path))
}

/// Opens a private in-memory SQLite database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", PathBuf::from(IN_MEMORY_PATH), Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    path: PathBuf,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let configured = open().and_then(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    });

    match configured {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=storage_unavailable error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(DbError::StorageUnavailable { path, source: err })
        }
    }
}
