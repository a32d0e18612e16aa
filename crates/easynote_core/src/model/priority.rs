//! Priority catalog entries.
//!
//! # Invariants
//! - The set is closed: rows are written only by the default-data seeder.
//! - Lower id means higher rank; queries sort by id ascending.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable priority identifier assigned at seed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityId(pub i64);

impl Display for PriorityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One seeded priority level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    /// Unique display name, also usable as a lookup key.
    pub name: String,
}

impl Priority {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: PriorityId(id),
            name: name.into(),
        }
    }
}

pub const PRIORITY_IMPORTANT: &str = "Important";
pub const PRIORITY_NORMAL: &str = "Normal";
pub const PRIORITY_LOW: &str = "Low";

/// Priority set written by the seeder, in rank order.
pub fn default_priorities() -> Vec<Priority> {
    vec![
        Priority::new(1, PRIORITY_IMPORTANT),
        Priority::new(2, PRIORITY_NORMAL),
        Priority::new(3, PRIORITY_LOW),
    ]
}
