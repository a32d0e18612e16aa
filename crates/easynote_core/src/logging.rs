//! Core logging bootstrap.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Capture panics into the log with a sanitized payload.
//!
//! # Invariants
//! - Initialization is idempotent for the same level and directory.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.
//! - Core events carry ids and counts only, never note or list text.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "easynote";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    level: LevelFilter,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

impl LoggingState {
    fn ensure_matches(&self, level: LevelFilter, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

/// Initializes core logging with level and absolute directory.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging is already active with a different level or directory.
/// - The logger backend fails to start.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), String> {
    let level = parse_level(level)?;
    let log_dir = absolute_log_dir(log_dir.as_ref())?;

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, log_dir))?;
    state.ensure_matches(level, log_dir)
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LevelFilter, log_dir: &Path) -> Result<LoggingState, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let logger = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=core_init module=core status=ok level={} log_dir={} version={} build_mode={}",
        level,
        log_dir.display(),
        env!("CARGO_PKG_VERSION"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _logger: logger,
    })
}

// `off` is rejected; callers skip `init_logging` instead.
fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let trimmed = level.trim();
    let name = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match name.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{trimmed}`; expected trace|debug|info|warn|error"
        )),
        Ok(filter) => Ok(filter),
    }
}

fn absolute_log_dir(log_dir: &Path) -> Result<&Path, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if !log_dir.is_absolute() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            log_dir.display()
        ));
    }
    Ok(log_dir)
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            bounded_payload(message)
        );
        previous_hook(panic_info);
    }));
}

// Panic payloads may echo note text; keep one log line of bounded length.
fn bounded_payload(message: &str) -> String {
    let mut bounded: String = message
        .chars()
        .take(MAX_PANIC_PAYLOAD_CHARS)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    if message.chars().nth(MAX_PANIC_PAYLOAD_CHARS).is_some() {
        bounded.push_str("...");
    }
    bounded
}

#[cfg(test)]
mod tests {
    use super::{
        absolute_log_dir, bounded_payload, init_logging, logging_status, parse_level,
        MAX_PANIC_PAYLOAD_CHARS,
    };
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn parse_level_accepts_known_levels_and_rejects_off() {
        assert_eq!(parse_level("DEBUG"), Ok(LevelFilter::Debug));
        assert_eq!(parse_level(" warning "), Ok(LevelFilter::Warn));
        assert!(parse_level("off").is_err());
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn absolute_log_dir_rejects_empty_and_relative_paths() {
        assert!(absolute_log_dir(Path::new("")).is_err());
        let error = absolute_log_dir(Path::new("logs/dev")).expect_err("relative path");
        assert!(error.contains("absolute"));
    }

    #[test]
    fn bounded_payload_flattens_control_chars_and_truncates() {
        assert_eq!(bounded_payload("buy\nmilk\ttoday"), "buy milk today");

        let long = "x".repeat(MAX_PANIC_PAYLOAD_CHARS + 40);
        let bounded = bounded_payload(&long);
        assert!(bounded.ends_with("..."));
        assert_eq!(bounded.chars().count(), MAX_PANIC_PAYLOAD_CHARS + 3);
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let log_dir = tempfile::tempdir().expect("temp log dir");
        let other_dir = tempfile::tempdir().expect("second temp log dir");

        init_logging("info", log_dir.path()).expect("first init should succeed");
        init_logging("INFO", log_dir.path()).expect("same config should be idempotent");

        let level_error = init_logging("debug", log_dir.path()).expect_err("level conflict");
        assert!(level_error.contains("refusing to switch"));

        let dir_error = init_logging("info", other_dir.path()).expect_err("directory conflict");
        assert!(dir_error.contains("refusing to switch"));

        let (level, dir) = logging_status().expect("logging should be active");
        assert_eq!(level, LevelFilter::Info);
        assert_eq!(dir, log_dir.path());
    }
}
