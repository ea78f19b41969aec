//! CLI configuration resolved from flags and environment.
//!
//! # Invariants
//! - Flags take precedence over environment variables.
//! - File logging is enabled only when a log directory is configured.

use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKY_DB_PATH";
pub const LOG_DIR_ENV: &str = "TASKY_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TASKY_LOG_LEVEL";
const DEFAULT_DB_FILE: &str = "tasky.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl CliConfig {
    /// Resolves configuration using `lookup` for environment access.
    pub fn resolve(db_flag: Option<PathBuf>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            db_path: db_flag
                .or_else(|| non_empty(DB_PATH_ENV).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
            log_dir: non_empty(LOG_DIR_ENV),
            log_level: non_empty(LOG_LEVEL_ENV)
                .unwrap_or_else(|| tasky_core::default_log_level().to_string()),
        }
    }

    pub fn from_env(db_flag: Option<PathBuf>) -> Self {
        Self::resolve(db_flag, |key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::{CliConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = CliConfig::resolve(None, |_| None);
        assert_eq!(config.db_path, PathBuf::from("tasky.db"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, tasky_core::default_log_level());
    }

    #[test]
    fn environment_overrides_defaults_and_flag_overrides_environment() {
        let vars = env(&[
            (DB_PATH_ENV, "/tmp/env.db"),
            (LOG_DIR_ENV, "/tmp/logs"),
            (LOG_LEVEL_ENV, "warn"),
        ]);
        let from_env = CliConfig::resolve(None, |key| vars.get(key).cloned());
        assert_eq!(from_env.db_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(from_env.log_dir.as_deref(), Some("/tmp/logs"));
        assert_eq!(from_env.log_level, "warn");

        let flagged = CliConfig::resolve(Some(PathBuf::from("flag.db")), |key| {
            vars.get(key).cloned()
        });
        assert_eq!(flagged.db_path, PathBuf::from("flag.db"));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let vars = env(&[(LOG_DIR_ENV, "  ")]);
        let config = CliConfig::resolve(None, |key| vars.get(key).cloned());
        assert_eq!(config.log_dir, None);
    }
}
