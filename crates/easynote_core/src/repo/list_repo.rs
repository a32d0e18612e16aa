//! List store contract and SQLite implementation.
//!
//! # Responsibility
//! - Create, rename, trash, restore and purge named lists.
//! - Resolve list names to ids for note writes.
//!
//! # Invariants
//! - Active listings are in insertion order (`list_id ASC`).
//! - Name lookups pick the lowest id when names are duplicated.
//! - Trashing a list here only flips the list flag; the note fan-out is the
//!   facade's job.

use crate::model::notes_list::{ListId, NotesList};
use crate::repo::{bool_to_int, int_to_bool, Lookup, RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

const LIST_SELECT_SQL: &str = "SELECT list_id, list_name, in_trash FROM lists";

/// Repository interface for list operations.
pub trait ListStore {
    /// Inserts an active list and returns its id.
    fn add(&self, name: &str) -> RepoResult<ListId>;
    fn get_by_id(&self, id: ListId) -> RepoResult<NotesList>;
    fn get_id_by_name(&self, name: &str) -> RepoResult<ListId>;
    fn get_name_by_id(&self, id: ListId) -> RepoResult<String>;
    /// Returns whether a list row with this id exists, trashed or not.
    fn contains(&self, id: ListId) -> RepoResult<bool>;
    fn list_all_active_names(&self) -> RepoResult<Vec<String>>;
    fn list_all_active(&self) -> RepoResult<Vec<NotesList>>;
    fn list_all_trashed(&self) -> RepoResult<Vec<NotesList>>;
    /// Overwrites the name for `list.id`; no-op when the id is unknown.
    fn update(&self, list: &NotesList) -> RepoResult<()>;
    fn move_to_trash(&self, id: ListId) -> RepoResult<()>;
    fn restore_from_trash(&self, id: ListId) -> RepoResult<()>;
    /// Hard-deletes every trashed list and returns the number removed.
    ///
    /// Notes are left untouched; `NotesDatabase` removes the notes of trashed
    /// lists in the same transaction.
    fn delete_trashed(&self) -> RepoResult<usize>;
}

/// SQLite-backed list store.
pub struct SqliteListStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn set_trash_flag(&self, id: ListId, in_trash: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE lists SET in_trash = ?1 WHERE list_id = ?2;",
            params![bool_to_int(in_trash), id.0],
        )?;
        log_write("list_trash_flag", id, changed);
        Ok(())
    }

    fn query_lists(&self, in_trash: bool) -> RepoResult<Vec<NotesList>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL} WHERE in_trash = ?1 ORDER BY list_id ASC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(in_trash)])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }
}

impl ListStore for SqliteListStore<'_> {
    fn add(&self, name: &str) -> RepoResult<ListId> {
        self.conn.execute(
            "INSERT INTO lists (list_name, in_trash) VALUES (?1, 0);",
            [name],
        )?;
        let id = ListId(self.conn.last_insert_rowid());
        debug!("event=list_add module=list_repo status=ok list_id={id}");
        Ok(id)
    }

    fn get_by_id(&self, id: ListId) -> RepoResult<NotesList> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} WHERE list_id = ?1;"))?;
        let mut rows = stmt.query([id.0])?;
        match rows.next()? {
            Some(row) => parse_list_row(row),
            None => Err(RepoError::NotFound(Lookup::ListId(id))),
        }
    }

    fn get_id_by_name(&self, name: &str) -> RepoResult<ListId> {
        self.conn
            .query_row(
                "SELECT list_id FROM lists WHERE list_name = ?1 ORDER BY list_id ASC LIMIT 1;",
                [name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .map(ListId)
            .ok_or_else(|| RepoError::NotFound(Lookup::ListName(name.to_string())))
    }

    fn get_name_by_id(&self, id: ListId) -> RepoResult<String> {
        self.get_by_id(id).map(|list| list.name)
    }

    fn contains(&self, id: ListId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM lists WHERE list_id = ?1);",
            [id.0],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_all_active_names(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT list_name FROM lists WHERE in_trash = 0 ORDER BY list_id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }
        Ok(names)
    }

    fn list_all_active(&self) -> RepoResult<Vec<NotesList>> {
        self.query_lists(false)
    }

    fn list_all_trashed(&self) -> RepoResult<Vec<NotesList>> {
        self.query_lists(true)
    }

    fn update(&self, list: &NotesList) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE lists SET list_name = ?1 WHERE list_id = ?2;",
            params![list.name.as_str(), list.id.0],
        )?;
        log_write("list_update", list.id, changed);
        Ok(())
    }

    fn move_to_trash(&self, id: ListId) -> RepoResult<()> {
        self.set_trash_flag(id, true)
    }

    fn restore_from_trash(&self, id: ListId) -> RepoResult<()> {
        self.set_trash_flag(id, false)
    }

    fn delete_trashed(&self) -> RepoResult<usize> {
        let deleted = self.conn.execute("DELETE FROM lists WHERE in_trash = 1;", [])?;
        debug!("event=list_purge module=list_repo status=ok deleted={deleted}");
        Ok(deleted)
    }
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<NotesList> {
    Ok(NotesList {
        id: ListId(row.get("list_id")?),
        name: row.get("list_name")?,
        in_trash: int_to_bool(row.get("in_trash")?, "lists.in_trash")?,
    })
}

fn log_write(event: &str, id: ListId, changed: usize) {
    if changed == 0 {
        warn!("event={event} module=list_repo status=noop list_id={id} reason=unknown_id");
    } else {
        debug!("event={event} module=list_repo status=ok list_id={id}");
    }
}
