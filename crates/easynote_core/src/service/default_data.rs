//! Default data written when the schema is created fresh.
//!
//! # Responsibility
//! - Seed the closed priority set, the default list and example notes.
//!
//! # Invariants
//! - Runs only from the facade's create callback, never on upgrade.
//! - Example notes reference their priority and list by name, so seeding goes
//!   through the same resolution path as any caller write.

use crate::model::note::Note;
use crate::model::notes_list::DEFAULT_LIST_NAME;
use crate::model::priority::{
    default_priorities, PRIORITY_IMPORTANT, PRIORITY_LOW, PRIORITY_NORMAL,
};
use crate::model::reference::EntityRef;
use crate::repo::list_repo::{ListStore, SqliteListStore};
use crate::repo::note_repo::{NoteStore, SqliteNoteStore};
use crate::repo::priority_repo::seed_priorities;
use crate::repo::RepoResult;
use log::info;
use rusqlite::Connection;

/// Example notes as `(text, priority name)`, in insertion order.
pub const DEFAULT_NOTES: &[(&str, &str)] = &[
    ("Tap a note to edit it", PRIORITY_NORMAL),
    ("Swipe a note aside to move it to trash", PRIORITY_NORMAL),
    ("Important notes stay on top of the list", PRIORITY_IMPORTANT),
    ("Low priority notes sink to the bottom", PRIORITY_LOW),
];

/// Counts of rows written by [`fill_with_default_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDataSummary {
    pub priorities: usize,
    pub lists: usize,
    pub notes: usize,
}

/// Writes priorities, the default list and example notes.
///
/// Expects freshly created, empty tables.
pub fn fill_with_default_data(conn: &Connection) -> RepoResult<DefaultDataSummary> {
    let priorities = default_priorities();
    seed_priorities(conn, &priorities)?;

    SqliteListStore::new(conn).add(DEFAULT_LIST_NAME)?;

    let notes = SqliteNoteStore::new(conn);
    for (text, priority) in DEFAULT_NOTES {
        let note = Note::new(
            *text,
            EntityRef::Name((*priority).to_string()),
            EntityRef::Name(DEFAULT_LIST_NAME.to_string()),
        );
        notes.add(&note)?;
    }

    let summary = DefaultDataSummary {
        priorities: priorities.len(),
        lists: 1,
        notes: DEFAULT_NOTES.len(),
    };
    info!(
        "event=default_data_seed module=service status=ok priorities={} lists={} notes={}",
        summary.priorities, summary.lists, summary.notes
    );
    Ok(summary)
}
