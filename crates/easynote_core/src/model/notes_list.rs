//! Named note lists.
//!
//! # Invariants
//! - `id` is stable across renames.
//! - Moving a list to trash does not delete its notes; they are flagged by
//!   the facade in the same transaction.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned list identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub i64);

impl Display for ListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesList {
    pub id: ListId,
    /// Free text; uniqueness is not enforced.
    pub name: String,
    pub in_trash: bool,
}

impl NotesList {
    /// Returns a copy carrying a new name and the same id.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            in_trash: self.in_trash,
        }
    }
}

/// Name of the list created by the default-data seeder.
pub const DEFAULT_LIST_NAME: &str = "Personal";
