//! Query facade over the priority catalog, list store and note store.
//!
//! # Responsibility
//! - Own the single storage connection and hand it to each store.
//! - Run the schema create/upgrade callbacks when the database is opened.
//! - Provide the process-wide lazily initialized instance.
//! - Run composite operations (list trash fan-out, trash purge) atomically.
//!
//! # Invariants
//! - Default data is seeded only when the schema is created fresh.
//! - An outdated schema is recreated only under `UpgradePolicy::Recreate`.
//! - The shared instance is constructed at most once per process.
//! - Purging a list purges its notes; no note outlives its list row.

use crate::config::DatabaseConfig;
use crate::db::migrations::{
    create_schema, current_user_version, drop_schema, inspect_schema, latest_version,
    stamp_version, SchemaState, UpgradePolicy,
};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::{Note, NoteId, NoteRecord};
use crate::model::notes_list::{ListId, NotesList};
use crate::model::priority::{Priority, PriorityId};
use crate::repo::list_repo::{ListStore, SqliteListStore};
use crate::repo::note_repo::{NoteStore, SqliteNoteStore};
use crate::repo::priority_repo::{PriorityCatalog, SqlitePriorityCatalog};
use crate::repo::{RepoError, RepoResult};
use crate::service::default_data::fill_with_default_data;
use log::{info, warn};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

static SHARED_DATABASE: OnceCell<SharedDatabase> = OnceCell::new();

struct SharedDatabase {
    path: PathBuf,
    database: Mutex<NotesDatabase>,
}

/// What the open-time schema check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// Schema created and default data seeded.
    Created,
    /// Outdated schema dropped and recreated empty.
    Recreated { from_version: u32 },
    /// Schema already at the current version.
    Current,
}

/// Counts of rows removed by [`NotesDatabase::purge_trash`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub notes: usize,
    pub lists: usize,
}

/// Single entry point for every persistence operation.
pub struct NotesDatabase {
    conn: Connection,
    path: PathBuf,
    schema_outcome: SchemaOutcome,
}

impl NotesDatabase {
    /// Opens the configured database file and prepares its schema.
    pub fn open(config: &DatabaseConfig) -> RepoResult<Self> {
        let conn = open_db(&config.path)?;
        Self::from_connection(conn, config.path.clone(), config.upgrade_policy)
    }

    /// Opens a private in-memory database with freshly seeded default data.
    pub fn open_in_memory() -> RepoResult<Self> {
        let conn = open_db_in_memory()?;
        Self::from_connection(conn, PathBuf::from(":memory:"), UpgradePolicy::default())
    }

    /// Returns the process-wide instance, opening it on first use.
    ///
    /// Concurrent first callers block until one of them has finished opening;
    /// all of them receive the same instance.
    ///
    /// # Errors
    /// - Propagates open/schema errors from the first initialization.
    /// - Returns `InvalidInput` when already initialized for another path.
    pub fn shared(config: &DatabaseConfig) -> RepoResult<&'static Mutex<NotesDatabase>> {
        let state = SHARED_DATABASE.get_or_try_init(|| -> RepoResult<SharedDatabase> {
            let database = Self::open(config)?;
            info!(
                "event=shared_db_init module=service status=ok path={}",
                config.path.display()
            );
            Ok(SharedDatabase {
                path: config.path.clone(),
                database: Mutex::new(database),
            })
        })?;

        if state.path != config.path {
            return Err(RepoError::InvalidInput(format!(
                "shared database already opened at `{}`; refusing to switch to `{}`",
                state.path.display(),
                config.path.display()
            )));
        }

        Ok(&state.database)
    }

    /// Locks the process-wide instance.
    ///
    /// A poisoned lock is recovered: the connection stays usable after a
    /// panicking caller because every statement is atomic on its own.
    pub fn lock_shared(config: &DatabaseConfig) -> RepoResult<MutexGuard<'static, NotesDatabase>> {
        let shared = Self::shared(config)?;
        Ok(shared.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn from_connection(conn: Connection, path: PathBuf, policy: UpgradePolicy) -> RepoResult<Self> {
        let mut database = Self {
            conn,
            path,
            schema_outcome: SchemaOutcome::Current,
        };
        database.schema_outcome = database.prepare_schema(policy)?;
        Ok(database)
    }

    fn prepare_schema(&mut self, policy: UpgradePolicy) -> RepoResult<SchemaOutcome> {
        match inspect_schema(&self.conn)? {
            SchemaState::Fresh => {
                self.on_create()?;
                Ok(SchemaOutcome::Created)
            }
            SchemaState::Current => Ok(SchemaOutcome::Current),
            SchemaState::Outdated { db_version } => {
                self.on_upgrade(db_version, policy)?;
                Ok(SchemaOutcome::Recreated {
                    from_version: db_version,
                })
            }
        }
    }

    fn on_create(&mut self) -> RepoResult<()> {
        let tx = self.conn.transaction()?;
        create_schema(&tx)?;
        fill_with_default_data(&tx)?;
        stamp_version(&tx)?;
        tx.commit()?;
        info!(
            "event=schema_create module=service status=ok version={}",
            latest_version()
        );
        Ok(())
    }

    fn on_upgrade(&mut self, db_version: u32, policy: UpgradePolicy) -> RepoResult<()> {
        let latest = latest_version();
        match policy {
            UpgradePolicy::Refuse => {
                warn!(
                    "event=schema_upgrade module=service status=error policy={policy} from={db_version} to={latest} error_code=upgrade_refused"
                );
                Err(DbError::SchemaUpgradeRefused {
                    db_version,
                    latest_supported: latest,
                }
                .into())
            }
            UpgradePolicy::Recreate => {
                let tx = self.conn.transaction()?;
                drop_schema(&tx)?;
                create_schema(&tx)?;
                stamp_version(&tx)?;
                tx.commit()?;
                warn!(
                    "event=schema_upgrade module=service status=ok policy={policy} from={db_version} to={latest} data_loss=true"
                );
                Ok(())
            }
        }
    }

    /// Location the connection was opened from (`:memory:` for in-memory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema_outcome(&self) -> SchemaOutcome {
        self.schema_outcome
    }

    pub fn schema_version(&self) -> RepoResult<u32> {
        Ok(current_user_version(&self.conn)?)
    }

    /// Raw connection for diagnostics; application writes go through the
    /// typed operations.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn priorities(&self) -> SqlitePriorityCatalog<'_> {
        SqlitePriorityCatalog::new(&self.conn)
    }

    fn lists(&self) -> SqliteListStore<'_> {
        SqliteListStore::new(&self.conn)
    }

    fn notes(&self) -> SqliteNoteStore<'_> {
        SqliteNoteStore::new(&self.conn)
    }

    // Priority catalog.

    pub fn resolve_priority_id(&self, name: &str) -> RepoResult<PriorityId> {
        self.priorities().resolve_id_by_name(name)
    }

    pub fn get_priority(&self, id: PriorityId) -> RepoResult<Priority> {
        self.priorities().get_by_id(id)
    }

    pub fn list_priorities(&self) -> RepoResult<Vec<Priority>> {
        self.priorities().list_all()
    }

    // List store.

    pub fn add_list(&self, name: &str) -> RepoResult<ListId> {
        self.lists().add(name)
    }

    pub fn get_list_by_id(&self, id: ListId) -> RepoResult<NotesList> {
        self.lists().get_by_id(id)
    }

    pub fn get_list_id_by_name(&self, name: &str) -> RepoResult<ListId> {
        self.lists().get_id_by_name(name)
    }

    pub fn get_list_name_by_id(&self, id: ListId) -> RepoResult<String> {
        self.lists().get_name_by_id(id)
    }

    pub fn list_all_active_names(&self) -> RepoResult<Vec<String>> {
        self.lists().list_all_active_names()
    }

    pub fn list_all_active_lists(&self) -> RepoResult<Vec<NotesList>> {
        self.lists().list_all_active()
    }

    pub fn list_all_trashed_lists(&self) -> RepoResult<Vec<NotesList>> {
        self.lists().list_all_trashed()
    }

    /// Renames `list.id` in place; no-op for an unknown id.
    pub fn update_list(&self, list: &NotesList) -> RepoResult<()> {
        self.lists().update(list)
    }

    /// Trashes a list and every one of its active notes in one transaction.
    ///
    /// Returns the number of notes moved to trash.
    pub fn move_list_to_trash(&mut self, id: ListId) -> RepoResult<usize> {
        let tx = self.conn.transaction()?;
        SqliteListStore::new(&tx).move_to_trash(id)?;
        let moved = SqliteNoteStore::new(&tx).move_all_from_list_to_trash(id)?;
        tx.commit()?;
        info!("event=list_trash module=service status=ok list_id={id} notes_moved={moved}");
        Ok(moved)
    }

    /// Clears the list trash flag. Its notes stay in trash.
    pub fn restore_list_from_trash(&self, id: ListId) -> RepoResult<()> {
        self.lists().restore_from_trash(id)
    }

    /// Hard-deletes trashed lists together with every note they still hold.
    ///
    /// Returns the number of lists removed.
    pub fn delete_trashed_lists(&mut self) -> RepoResult<usize> {
        let tx = self.conn.transaction()?;
        let notes = SqliteNoteStore::new(&tx).delete_all_in_trashed_lists()?;
        let lists = SqliteListStore::new(&tx).delete_trashed()?;
        tx.commit()?;
        info!("event=list_purge module=service status=ok lists={lists} notes={notes}");
        Ok(lists)
    }

    // Note store.

    pub fn add_note(&self, note: &Note) -> RepoResult<NoteId> {
        self.notes().add(note)
    }

    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteRecord>> {
        self.notes().get_by_id(id)
    }

    pub fn get_all_notes(&self) -> RepoResult<Vec<NoteRecord>> {
        self.notes().get_all()
    }

    pub fn get_all_notes_from_list(&self, list_id: ListId) -> RepoResult<Vec<NoteRecord>> {
        self.notes().get_all_from_list(list_id)
    }

    pub fn get_all_notes_from_trash(&self) -> RepoResult<Vec<NoteRecord>> {
        self.notes().get_all_from_trash()
    }

    pub fn search_notes(&self, query: &str, in_trash_only: bool) -> RepoResult<Vec<NoteRecord>> {
        self.notes().search(query, in_trash_only)
    }

    /// Searches active notes of every list.
    pub fn search_active_notes(&self, query: &str) -> RepoResult<Vec<NoteRecord>> {
        self.search_notes(query, false)
    }

    pub fn search_trash(&self, query: &str) -> RepoResult<Vec<NoteRecord>> {
        self.search_notes(query, true)
    }

    pub fn update_note(&self, note: &Note) -> RepoResult<()> {
        self.notes().update(note)
    }

    pub fn move_note_to_trash(&self, id: NoteId) -> RepoResult<()> {
        self.notes().move_to_trash(id)
    }

    pub fn restore_note_from_trash(&self, id: NoteId) -> RepoResult<()> {
        self.notes().restore_from_trash(id)
    }

    pub fn move_note_to_another_list(&self, id: NoteId, destination: ListId) -> RepoResult<()> {
        self.notes().move_to_another_list(id, destination)
    }

    /// Trashes every active note of a list without touching the list row.
    pub fn move_all_notes_from_list_to_trash(&mut self, list_id: ListId) -> RepoResult<usize> {
        let tx = self.conn.transaction()?;
        let moved = SqliteNoteStore::new(&tx).move_all_from_list_to_trash(list_id)?;
        tx.commit()?;
        Ok(moved)
    }

    pub fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        self.notes().delete(id)
    }

    pub fn count_empty_notes_in_list(&self, list_id: ListId) -> RepoResult<usize> {
        self.notes().count_empty_in_list(list_id)
    }

    pub fn count_all_empty_notes(&self) -> RepoResult<usize> {
        self.notes().count_all_empty()
    }

    pub fn delete_empty_notes_from_list(&self, list_id: ListId) -> RepoResult<usize> {
        self.notes().delete_empty_in_list(list_id)
    }

    pub fn delete_all_empty_notes(&self) -> RepoResult<usize> {
        self.notes().delete_all_empty()
    }

    pub fn delete_trashed_notes(&self) -> RepoResult<usize> {
        self.notes().delete_trashed()
    }

    /// Hard-deletes trashed notes, then trashed lists with every note they
    /// still hold, in one transaction.
    ///
    /// Notes restored or added into a trashed list are purged with it.
    pub fn purge_trash(&mut self) -> RepoResult<PurgeSummary> {
        let tx = self.conn.transaction()?;
        let notes = {
            let store = SqliteNoteStore::new(&tx);
            store.delete_trashed()? + store.delete_all_in_trashed_lists()?
        };
        let lists = SqliteListStore::new(&tx).delete_trashed()?;
        tx.commit()?;
        info!("event=trash_purge module=service status=ok notes={notes} lists={lists}");
        Ok(PurgeSummary { notes, lists })
    }
}
