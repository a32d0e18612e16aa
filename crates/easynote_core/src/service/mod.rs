//! Facade and default-data services.
//!
//! # Responsibility
//! - Expose one entry point (`NotesDatabase`) to UI collaborators.
//! - Keep callers decoupled from individual stores and SQL.

pub mod default_data;
pub mod notes_database;
