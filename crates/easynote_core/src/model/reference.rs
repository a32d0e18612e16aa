//! Tagged foreign-key references.
//!
//! A note points at its priority and its list either by a known id or by a
//! display name that still has to be looked up. Name references are resolved
//! exactly once, at the store write boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Reference to a catalog row by resolved id or by unresolved display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef<I> {
    /// Already-resolved storage id.
    Id(I),
    /// Display name to be resolved before the row is written.
    Name(String),
}

impl<I: Display> Display for EntityRef<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Name(name) => write!(f, "name=`{name}`"),
        }
    }
}
