//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `easynote_core` linkage against the configured database.
//! - Print a deterministic summary: version, schema version, lists, counts.

use easynote_core::{
    core_version, default_log_level, init_logging, DatabaseConfig, NotesDatabase, RepoResult,
};
use log::error;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "EASYNOTE_LOG_DIR";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("easynote logging disabled: {err}");
        }
    }

    let config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("easynote config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match print_summary(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_summary module=cli status=error error={err}");
            eprintln!("easynote error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(config: &DatabaseConfig) -> RepoResult<()> {
    let database = NotesDatabase::lock_shared(config)?;

    println!("easynote_core version={}", core_version());
    println!("database path={}", database.path().display());
    println!("schema version={}", database.schema_version()?);

    for list in database.list_all_active_lists()? {
        let notes = database.get_all_notes_from_list(list.id)?;
        let empty = database.count_empty_notes_in_list(list.id)?;
        println!(
            "list id={} name={:?} notes={} empty={}",
            list.id,
            list.name,
            notes.len(),
            empty
        );
    }
    println!("trash notes={}", database.get_all_notes_from_trash()?.len());

    Ok(())
}
