//! SQLite storage bootstrap and schema registry.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection used by core.
//! - Describe the schema, its version, and the upgrade policy.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Application data is not read or written before the facade has run its
//!   create/upgrade callbacks.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The connection could not be opened or configured.
    StorageUnavailable {
        path: PathBuf,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// An older schema was found and the upgrade policy forbids recreating it.
    SchemaUpgradeRefused {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::StorageUnavailable { path, source } => {
                write!(f, "storage unavailable at `{}`: {source}", path.display())
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::SchemaUpgradeRefused {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is older than {latest_supported} and the upgrade policy refuses to recreate it"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::StorageUnavailable { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } | Self::SchemaUpgradeRefused { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
