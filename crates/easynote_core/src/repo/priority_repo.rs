//! Priority catalog contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve priority names to stable ids.
//! - Expose the seeded set read-only.
//!
//! # Invariants
//! - The catalog has no create/update/delete surface; only the default-data
//!   seeder writes rows, through `seed_priorities`.

use crate::model::priority::{Priority, PriorityId};
use crate::repo::{Lookup, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Read-only access to the seeded priority levels.
pub trait PriorityCatalog {
    /// Resolves a display name to its id.
    fn resolve_id_by_name(&self, name: &str) -> RepoResult<PriorityId>;
    fn get_by_id(&self, id: PriorityId) -> RepoResult<Priority>;
    /// Returns whether a priority with this id has been seeded.
    fn contains(&self, id: PriorityId) -> RepoResult<bool>;
    /// Lists every priority in rank order (id ascending).
    fn list_all(&self) -> RepoResult<Vec<Priority>>;
}

/// SQLite-backed priority catalog.
pub struct SqlitePriorityCatalog<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePriorityCatalog<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PriorityCatalog for SqlitePriorityCatalog<'_> {
    fn resolve_id_by_name(&self, name: &str) -> RepoResult<PriorityId> {
        self.conn
            .query_row(
                "SELECT priority_id FROM priorities WHERE priority_name = ?1;",
                [name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .map(PriorityId)
            .ok_or_else(|| RepoError::NotFound(Lookup::PriorityName(name.to_string())))
    }

    fn get_by_id(&self, id: PriorityId) -> RepoResult<Priority> {
        self.conn
            .query_row(
                "SELECT priority_id, priority_name FROM priorities WHERE priority_id = ?1;",
                [id.0],
                |row| Ok(Priority::new(row.get(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?
            .ok_or(RepoError::NotFound(Lookup::PriorityId(id)))
    }

    fn contains(&self, id: PriorityId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM priorities WHERE priority_id = ?1);",
            [id.0],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_all(&self) -> RepoResult<Vec<Priority>> {
        let mut stmt = self.conn.prepare(
            "SELECT priority_id, priority_name FROM priorities ORDER BY priority_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut priorities = Vec::new();
        while let Some(row) = rows.next()? {
            priorities.push(Priority::new(row.get(0)?, row.get::<_, String>(1)?));
        }
        Ok(priorities)
    }
}

/// Writes the closed priority set with its fixed ids.
pub(crate) fn seed_priorities(conn: &Connection, priorities: &[Priority]) -> RepoResult<()> {
    let mut stmt = conn
        .prepare("INSERT INTO priorities (priority_id, priority_name) VALUES (?1, ?2);")?;
    for priority in priorities {
        stmt.execute(params![priority.id.0, priority.name.as_str()])?;
    }
    debug!(
        "event=priority_seed module=priority_repo status=ok count={}",
        priorities.len()
    );
    Ok(())
}
