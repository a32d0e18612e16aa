//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes and resolve their priority/list references on write.
//! - Provide the ordered list, trash and search queries.
//! - Own trash lifecycle and empty-note cleanup for notes.
//!
//! # Invariants
//! - Every written row has an existing `priority_id` and `list_id`; name
//!   references are resolved here and nowhere deeper.
//! - Query order is `priority_id ASC, modification_timestamp DESC,
//!   note_id DESC`.
//! - Trash flag changes never touch `modification_timestamp`.
//! - Notes of a trashed list go with it when the list is purged.
//! - Logs carry ids only, never note text.

use crate::model::note::{
    next_modification_time, ListRef, Note, NoteId, NoteRecord, PriorityRef,
};
use crate::model::notes_list::ListId;
use crate::model::priority::{Priority, PriorityId};
use crate::model::reference::EntityRef;
use crate::repo::list_repo::{ListStore, SqliteListStore};
use crate::repo::priority_repo::{PriorityCatalog, SqlitePriorityCatalog};
use crate::repo::{bool_to_int, int_to_bool, DanglingRef, RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    notes.note_id AS note_id,
    notes.modification_timestamp AS modification_timestamp,
    notes.text AS text,
    notes.in_trash AS in_trash,
    notes.priority_id AS priority_id,
    priorities.priority_name AS priority_name,
    notes.list_id AS list_id,
    lists.list_name AS list_name
FROM notes
LEFT OUTER JOIN priorities ON priorities.priority_id = notes.priority_id
LEFT OUTER JOIN lists ON lists.list_id = notes.list_id";

const NOTE_ORDER_SQL: &str = " ORDER BY
    notes.priority_id ASC,
    notes.modification_timestamp DESC,
    notes.note_id DESC";

// SQLite's one-argument trim() strips spaces only.
const BLANK_TEXT_SQL: &str = "trim(text, ' ' || char(9) || char(10) || char(13)) = ''";

/// Repository interface for note operations.
pub trait NoteStore {
    /// Resolves references, inserts the note and returns its id.
    fn add(&self, note: &Note) -> RepoResult<NoteId>;
    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<NoteRecord>>;
    /// Every note regardless of list or trash state.
    fn get_all(&self) -> RepoResult<Vec<NoteRecord>>;
    /// Active notes of one list.
    fn get_all_from_list(&self, list_id: ListId) -> RepoResult<Vec<NoteRecord>>;
    /// Trashed notes of every list.
    fn get_all_from_trash(&self) -> RepoResult<Vec<NoteRecord>>;
    /// Literal substring search on text, scoped by trash state.
    fn search(&self, query: &str, in_trash_only: bool) -> RepoResult<Vec<NoteRecord>>;
    /// Overwrites the row for `note.id`; no-op when the id is unknown.
    fn update(&self, note: &Note) -> RepoResult<()>;
    fn move_to_trash(&self, id: NoteId) -> RepoResult<()>;
    fn restore_from_trash(&self, id: NoteId) -> RepoResult<()>;
    fn move_to_another_list(&self, id: NoteId, destination: ListId) -> RepoResult<()>;
    /// Trashes every active note of a list and returns how many were moved.
    fn move_all_from_list_to_trash(&self, list_id: ListId) -> RepoResult<usize>;
    fn delete(&self, id: NoteId) -> RepoResult<()>;
    fn count_empty_in_list(&self, list_id: ListId) -> RepoResult<usize>;
    fn count_all_empty(&self) -> RepoResult<usize>;
    /// Hard-deletes blank notes of a list, trashed or not.
    fn delete_empty_in_list(&self, list_id: ListId) -> RepoResult<usize>;
    fn delete_all_empty(&self) -> RepoResult<usize>;
    fn delete_trashed(&self) -> RepoResult<usize>;
    /// Hard-deletes every note, trashed or not, whose list is in trash.
    fn delete_all_in_trashed_lists(&self) -> RepoResult<usize>;
}

/// SQLite-backed note store.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn resolve_priority(&self, reference: &PriorityRef) -> RepoResult<PriorityId> {
        let catalog = SqlitePriorityCatalog::new(self.conn);
        let dangling = || RepoError::ReferentialIntegrity(DanglingRef::Priority(reference.clone()));
        match reference {
            EntityRef::Id(id) => {
                if catalog.contains(*id)? {
                    Ok(*id)
                } else {
                    Err(dangling())
                }
            }
            EntityRef::Name(name) => match catalog.resolve_id_by_name(name) {
                Ok(id) => Ok(id),
                Err(RepoError::NotFound(_)) => Err(dangling()),
                Err(other) => Err(other),
            },
        }
    }

    fn resolve_list(&self, reference: &ListRef) -> RepoResult<ListId> {
        let lists = SqliteListStore::new(self.conn);
        let dangling = || RepoError::ReferentialIntegrity(DanglingRef::List(reference.clone()));
        match reference {
            EntityRef::Id(id) => {
                if lists.contains(*id)? {
                    Ok(*id)
                } else {
                    Err(dangling())
                }
            }
            EntityRef::Name(name) => match lists.get_id_by_name(name) {
                Ok(id) => Ok(id),
                Err(RepoError::NotFound(_)) => Err(dangling()),
                Err(other) => Err(other),
            },
        }
    }

    fn query_notes(&self, filter: &str, bind_values: Vec<Value>) -> RepoResult<Vec<NoteRecord>> {
        let sql = format!("{NOTE_SELECT_SQL}{filter}{NOTE_ORDER_SQL};");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn set_trash_flag(&self, id: NoteId, in_trash: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET in_trash = ?1 WHERE note_id = ?2;",
            params![bool_to_int(in_trash), id.0],
        )?;
        log_write("note_trash_flag", id, changed);
        Ok(())
    }

    fn count_where(&self, filter: &str, bind_values: Vec<Value>) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(note_id) FROM notes WHERE {filter};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn add(&self, note: &Note) -> RepoResult<NoteId> {
        let priority_id = self.resolve_priority(&note.priority)?;
        let list_id = self.resolve_list(&note.list)?;

        self.conn.execute(
            "INSERT INTO notes (
                modification_timestamp,
                text,
                in_trash,
                priority_id,
                list_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.modification_time,
                note.text.as_str(),
                bool_to_int(note.in_trash),
                priority_id.0,
                list_id.0,
            ],
        )?;

        let id = NoteId(self.conn.last_insert_rowid());
        debug!(
            "event=note_add module=note_repo status=ok note_id={id} priority_id={priority_id} list_id={list_id} in_trash={} text_len={}",
            note.in_trash,
            note.text.len()
        );
        Ok(id)
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<NoteRecord>> {
        let mut notes =
            self.query_notes(" WHERE notes.note_id = ?", vec![Value::Integer(id.0)])?;
        Ok(notes.pop())
    }

    fn get_all(&self) -> RepoResult<Vec<NoteRecord>> {
        self.query_notes("", Vec::new())
    }

    fn get_all_from_list(&self, list_id: ListId) -> RepoResult<Vec<NoteRecord>> {
        self.query_notes(
            " WHERE notes.list_id = ? AND notes.in_trash = 0",
            vec![Value::Integer(list_id.0)],
        )
    }

    fn get_all_from_trash(&self) -> RepoResult<Vec<NoteRecord>> {
        self.query_notes(" WHERE notes.in_trash = 1", Vec::new())
    }

    fn search(&self, query: &str, in_trash_only: bool) -> RepoResult<Vec<NoteRecord>> {
        self.query_notes(
            " WHERE notes.in_trash = ? AND notes.text LIKE ? ESCAPE '\\'",
            vec![
                Value::Integer(bool_to_int(in_trash_only)),
                Value::Text(like_pattern(query)),
            ],
        )
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        let id = note
            .id
            .ok_or_else(|| RepoError::InvalidInput("cannot update a note without id".to_string()))?;
        let priority_id = self.resolve_priority(&note.priority)?;
        let list_id = self.resolve_list(&note.list)?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                modification_timestamp = ?1,
                text = ?2,
                in_trash = ?3,
                priority_id = ?4,
                list_id = ?5
             WHERE note_id = ?6;",
            params![
                note.modification_time,
                note.text.as_str(),
                bool_to_int(note.in_trash),
                priority_id.0,
                list_id.0,
                id.0,
            ],
        )?;
        log_write("note_update", id, changed);
        Ok(())
    }

    fn move_to_trash(&self, id: NoteId) -> RepoResult<()> {
        self.set_trash_flag(id, true)
    }

    fn restore_from_trash(&self, id: NoteId) -> RepoResult<()> {
        self.set_trash_flag(id, false)
    }

    fn move_to_another_list(&self, id: NoteId, destination: ListId) -> RepoResult<()> {
        let list_id = self.resolve_list(&EntityRef::Id(destination))?;
        let changed = self.conn.execute(
            "UPDATE notes SET list_id = ?1, modification_timestamp = ?2 WHERE note_id = ?3;",
            params![list_id.0, next_modification_time(), id.0],
        )?;
        log_write("note_move_list", id, changed);
        Ok(())
    }

    fn move_all_from_list_to_trash(&self, list_id: ListId) -> RepoResult<usize> {
        let moved = self.conn.execute(
            "UPDATE notes SET in_trash = 1 WHERE list_id = ?1 AND in_trash = 0;",
            [list_id.0],
        )?;
        debug!("event=note_trash_list module=note_repo status=ok list_id={list_id} moved={moved}");
        Ok(moved)
    }

    fn delete(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE note_id = ?1;", [id.0])?;
        log_write("note_delete", id, changed);
        Ok(())
    }

    fn count_empty_in_list(&self, list_id: ListId) -> RepoResult<usize> {
        self.count_where(
            &format!("list_id = ? AND {BLANK_TEXT_SQL}"),
            vec![Value::Integer(list_id.0)],
        )
    }

    fn count_all_empty(&self) -> RepoResult<usize> {
        self.count_where(BLANK_TEXT_SQL, Vec::new())
    }

    fn delete_empty_in_list(&self, list_id: ListId) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            &format!("DELETE FROM notes WHERE list_id = ?1 AND {BLANK_TEXT_SQL};"),
            [list_id.0],
        )?;
        debug!("event=note_cleanup module=note_repo status=ok scope=list list_id={list_id} deleted={deleted}");
        Ok(deleted)
    }

    fn delete_all_empty(&self) -> RepoResult<usize> {
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM notes WHERE {BLANK_TEXT_SQL};"), [])?;
        debug!("event=note_cleanup module=note_repo status=ok scope=all deleted={deleted}");
        Ok(deleted)
    }

    fn delete_trashed(&self) -> RepoResult<usize> {
        let deleted = self.conn.execute("DELETE FROM notes WHERE in_trash = 1;", [])?;
        debug!("event=note_purge module=note_repo status=ok deleted={deleted}");
        Ok(deleted)
    }

    fn delete_all_in_trashed_lists(&self) -> RepoResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM notes
             WHERE list_id IN (SELECT list_id FROM lists WHERE in_trash = 1);",
            [],
        )?;
        debug!("event=note_purge module=note_repo status=ok scope=trashed_lists deleted={deleted}");
        Ok(deleted)
    }
}

/// Builds a `LIKE` pattern matching `query` literally as a substring.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<NoteRecord> {
    let id = NoteId(row.get("note_id")?);
    let priority_id = PriorityId(row.get("priority_id")?);
    let priority_name: Option<String> = row.get("priority_name")?;
    let Some(priority_name) = priority_name else {
        return Err(RepoError::InvalidData(format!(
            "note {id} references missing priority {priority_id}"
        )));
    };

    Ok(NoteRecord {
        id,
        modification_time: row.get("modification_timestamp")?,
        text: row.get("text")?,
        in_trash: int_to_bool(row.get("in_trash")?, "notes.in_trash")?,
        priority: Priority {
            id: priority_id,
            name: priority_name,
        },
        list_id: ListId(row.get("list_id")?),
        list_name: row.get("list_name")?,
    })
}

fn log_write(event: &str, id: NoteId, changed: usize) {
    if changed == 0 {
        warn!("event={event} module=note_repo status=noop note_id={id} reason=unknown_id");
    } else {
        debug!("event={event} module=note_repo status=ok note_id={id}");
    }
}
