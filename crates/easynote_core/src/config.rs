//! Database location and upgrade policy configuration.
//!
//! # Responsibility
//! - Describe where the notes database lives and how outdated schemas are
//!   handled.
//! - Read overrides from the process environment.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Unknown upgrade policies are rejected, never silently defaulted.

use crate::db::migrations::UpgradePolicy;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database file path.
pub const DB_PATH_ENV: &str = "EASYNOTE_DB_PATH";
/// Environment variable selecting the upgrade policy (`refuse|recreate`).
pub const UPGRADE_POLICY_ENV: &str = "EASYNOTE_UPGRADE_POLICY";

const DEFAULT_DB_FILE_NAME: &str = "easynote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub upgrade_policy: UpgradePolicy,
}

impl DatabaseConfig {
    /// Creates a config for `path` with the default (`refuse`) policy.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            upgrade_policy: UpgradePolicy::default(),
        }
    }

    pub fn with_upgrade_policy(mut self, policy: UpgradePolicy) -> Self {
        self.upgrade_policy = policy;
        self
    }

    /// Builds a config from `EASYNOTE_DB_PATH` and `EASYNOTE_UPGRADE_POLICY`.
    ///
    /// # Errors
    /// - Returns an error when the upgrade policy value is unsupported.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let path = non_blank(lookup(DB_PATH_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let upgrade_policy = match non_blank(lookup(UPGRADE_POLICY_ENV)) {
            Some(raw) => raw.parse()?,
            None => UpgradePolicy::default(),
        };
        Ok(Self {
            path,
            upgrade_policy,
        })
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(default_db_path())
    }
}

/// Returns `<temp_dir>/easynote.sqlite3`.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{default_db_path, DatabaseConfig, DB_PATH_ENV, UPGRADE_POLICY_ENV};
    use crate::db::migrations::UpgradePolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config.path, default_db_path());
        assert_eq!(config.upgrade_policy, UpgradePolicy::Refuse);
    }

    #[test]
    fn environment_overrides_path_and_policy() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, " /var/lib/easynote/notes.db "),
            (UPGRADE_POLICY_ENV, "recreate"),
        ]))
        .expect("overrides");
        assert_eq!(config.path, PathBuf::from("/var/lib/easynote/notes.db"));
        assert_eq!(config.upgrade_policy, UpgradePolicy::Recreate);
    }

    #[test]
    fn blank_path_falls_back_and_bad_policy_is_rejected() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[(DB_PATH_ENV, "   ")]))
            .expect("blank path");
        assert_eq!(config.path, default_db_path());

        let error = DatabaseConfig::from_lookup(lookup_from(&[(UPGRADE_POLICY_ENV, "wipe")]))
            .expect_err("unknown policy");
        assert!(error.contains("refuse|recreate"));
    }
}
