//! Note domain model.
//!
//! # Responsibility
//! - Define the write model (`Note`) accepted by the note store.
//! - Define the joined read model (`NoteRecord`) returned by queries.
//! - Provide the process-wide modification clock.
//!
//! # Invariants
//! - `modification_time` is epoch milliseconds and strictly increases for
//!   every value handed out by [`next_modification_time`] in this process.
//! - Text/priority/list edits refresh `modification_time`; trash flag edits
//!   do not.

use crate::model::notes_list::ListId;
use crate::model::priority::{Priority, PriorityId};
use crate::model::reference::EntityRef;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_MODIFICATION_MS: AtomicI64 = AtomicI64::new(0);

/// Storage-assigned note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type PriorityRef = EntityRef<PriorityId>;
pub type ListRef = EntityRef<ListId>;

/// Write model for note create/update calls.
///
/// `id` is `None` until the note has been inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<NoteId>,
    pub modification_time: i64,
    pub text: String,
    pub in_trash: bool,
    pub priority: PriorityRef,
    pub list: ListRef,
}

impl Note {
    /// Creates an unsaved, active note stamped with the current clock.
    pub fn new(text: impl Into<String>, priority: PriorityRef, list: ListRef) -> Self {
        Self {
            id: None,
            modification_time: next_modification_time(),
            text: text.into(),
            in_trash: false,
            priority,
            list,
        }
    }

    /// Replaces the text and refreshes the modification time.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.touch();
    }

    /// Replaces the priority reference and refreshes the modification time.
    pub fn set_priority(&mut self, priority: PriorityRef) {
        self.priority = priority;
        self.touch();
    }

    /// Replaces the list reference and refreshes the modification time.
    pub fn set_list(&mut self, list: ListRef) {
        self.list = list;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.modification_time = next_modification_time();
    }
}

/// Read model joined with priority and list names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub modification_time: i64,
    pub text: String,
    pub in_trash: bool,
    pub priority: Priority,
    pub list_id: ListId,
    /// `None` when the list row was removed outside `NotesDatabase`.
    pub list_name: Option<String>,
}

impl NoteRecord {
    /// Converts the record back into a write model with resolved references.
    pub fn to_note(&self) -> Note {
        Note {
            id: Some(self.id),
            modification_time: self.modification_time,
            text: self.text.clone(),
            in_trash: self.in_trash,
            priority: EntityRef::Id(self.priority.id),
            list: EntityRef::Id(self.list_id),
        }
    }
}

/// Returns a strictly increasing epoch-millisecond timestamp.
///
/// Wall-clock time is used when it moves forward; otherwise the previous
/// value plus one, so equal-millisecond edits still order by recency.
pub fn next_modification_time() -> i64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0);

    let mut last = LAST_MODIFICATION_MS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last.saturating_add(1));
        match LAST_MODIFICATION_MS.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
