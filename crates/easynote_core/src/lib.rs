//! Persistence and query core for EasyNote.
//! This crate is the single source of truth for note/list/priority invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::DatabaseConfig;
pub use db::migrations::{UpgradePolicy, SCHEMA_VERSION};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{next_modification_time, ListRef, Note, NoteId, NoteRecord, PriorityRef};
pub use model::notes_list::{ListId, NotesList, DEFAULT_LIST_NAME};
pub use model::priority::{Priority, PriorityId};
pub use model::reference::EntityRef;
pub use repo::list_repo::{ListStore, SqliteListStore};
pub use repo::note_repo::{NoteStore, SqliteNoteStore};
pub use repo::priority_repo::{PriorityCatalog, SqlitePriorityCatalog};
pub use repo::{DanglingRef, Lookup, RepoError, RepoResult};
pub use service::notes_database::{NotesDatabase, PurgeSummary, SchemaOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
