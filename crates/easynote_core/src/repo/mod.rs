//! Repository layer: priority catalog, list store and note store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the facade.
//!
//! # Invariants
//! - Stores borrow the connection they are given; they never open one.
//! - Lookups by id/name fail with `NotFound`; writes aimed at an unknown id
//!   are no-ops.
//! - Note writes fail with `ReferentialIntegrity` when a priority or list
//!   reference does not resolve.

use crate::db::DbError;
use crate::model::note::{ListRef, NoteId, PriorityRef};
use crate::model::notes_list::ListId;
use crate::model::priority::PriorityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod list_repo;
pub mod note_repo;
pub mod priority_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Key of a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    PriorityId(PriorityId),
    PriorityName(String),
    ListId(ListId),
    ListName(String),
    NoteId(NoteId),
}

impl Display for Lookup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PriorityId(id) => write!(f, "priority id={id}"),
            Self::PriorityName(name) => write!(f, "priority name=`{name}`"),
            Self::ListId(id) => write!(f, "list id={id}"),
            Self::ListName(name) => write!(f, "list name=`{name}`"),
            Self::NoteId(id) => write!(f, "note id={id}"),
        }
    }
}

/// Note reference that failed to resolve at the write boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingRef {
    Priority(PriorityRef),
    List(ListRef),
}

impl Display for DanglingRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Priority(reference) => write!(f, "priority {reference}"),
            Self::List(reference) => write!(f, "list {reference}"),
        }
    }
}

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(Lookup),
    /// A note references a priority or list that does not exist.
    ReferentialIntegrity(DanglingRef),
    InvalidInput(String),
    /// Persisted state cannot be mapped back to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(lookup) => write!(f, "not found: {lookup}"),
            Self::ReferentialIntegrity(reference) => {
                write!(f, "note references unknown {reference}")
            }
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::ReferentialIntegrity(_)
            | Self::InvalidInput(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
