//! Schema registry, version inspection and upgrade policy.
//!
//! # Responsibility
//! - Hold the DDL for the current schema version.
//! - Classify an opened database as fresh, current or outdated.
//! - Provide the create/drop/stamp primitives the facade callbacks use.
//!
//! # Invariants
//! - `SCHEMA_VERSION` must be bumped on any column layout change.
//! - A database stamped with a newer version is never touched.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Version of the schema described by `schema.sql`.
pub const SCHEMA_VERSION: u32 = 2;

const CREATE_SCHEMA_SQL: &str = include_str!("schema.sql");
const DROP_SCHEMA_SQL: &str = include_str!("drop.sql");

/// What to do when an existing database carries an older schema version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpgradePolicy {
    /// Fail with `DbError::SchemaUpgradeRefused`, leaving data untouched.
    #[default]
    Refuse,
    /// Drop every table and recreate the current schema without reseeding.
    /// All existing user data is lost.
    Recreate,
}

impl UpgradePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Refuse => "refuse",
            Self::Recreate => "recreate",
        }
    }
}

impl Display for UpgradePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpgradePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "refuse" => Ok(Self::Refuse),
            "recreate" => Ok(Self::Recreate),
            other => Err(format!(
                "unsupported upgrade policy `{other}`; expected refuse|recreate"
            )),
        }
    }
}

/// Classification of an opened database against `SCHEMA_VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// No schema has been stamped yet.
    Fresh,
    Current,
    Outdated { db_version: u32 },
}

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Inspects `PRAGMA user_version` and classifies the database.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this binary.
pub fn inspect_schema(conn: &Connection) -> DbResult<SchemaState> {
    let db_version = current_user_version(conn)?;
    let latest = latest_version();

    if db_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: latest,
        });
    }

    Ok(match db_version {
        0 => SchemaState::Fresh,
        version if version == latest => SchemaState::Current,
        version => SchemaState::Outdated {
            db_version: version,
        },
    })
}

/// Creates every table and index of the current schema.
pub fn create_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_SCHEMA_SQL)?;
    Ok(())
}

/// Drops every table of the schema, including all rows.
pub fn drop_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(DROP_SCHEMA_SQL)?;
    Ok(())
}

/// Stamps `PRAGMA user_version` with the current schema version.
pub fn stamp_version(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))?;
    Ok(())
}

pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
