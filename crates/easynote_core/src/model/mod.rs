//! Domain model for priorities, lists and notes.
//!
//! # Responsibility
//! - Define the entities mirrored to storage and the read models returned by
//!   queries.
//! - Model foreign-key references as tagged id-or-name values.
//!
//! # Invariants
//! - Ids are assigned by storage (lists, notes) or by seeding (priorities).
//! - Trash is a soft-delete flag; purging is the only hard delete.

pub mod note;
pub mod notes_list;
pub mod priority;
pub mod reference;
