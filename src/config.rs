use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::directory::StaticDirectory;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct KarmacatConfig {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    pub log_level: String,
    /// User name attributed to console-transport messages.
    pub console_user: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Static id→name tables for users and channels, for deployments without a
/// live directory collaborator.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DirectoryConfig {
    pub users: HashMap<String, String>,
    pub channels: HashMap<String, String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            console_user: "operator".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_karmacat_dir()
            .join("karmacat.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

/// Returns `~/.karmacat/`
pub fn default_karmacat_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".karmacat")
}

/// Returns the default config file path: `~/.karmacat/config.toml`
pub fn default_config_path() -> PathBuf {
    default_karmacat_dir().join("config.toml")
}

impl KarmacatConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            // The caller reports the missing file; a subscriber may not be
            // installed yet when config loads.
            KarmacatConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (KARMACAT_DB, KARMACAT_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KARMACAT_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("KARMACAT_LOG_LEVEL") {
            self.bot.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Build the lookup directory from the configured static tables.
    pub fn build_directory(&self) -> StaticDirectory {
        StaticDirectory::new(
            self.directory.users.clone(),
            self.directory.channels.clone(),
        )
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;

    #[test]
    fn default_config_is_valid() {
        let config = KarmacatConfig::default();
        assert_eq!(config.bot.log_level, "info");
        assert_eq!(config.bot.console_user, "operator");
        assert!(config.storage.db_path.ends_with("karmacat.db"));
        assert!(config.directory.users.is_empty());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[bot]
log_level = "debug"

[storage]
db_path = "/tmp/test.db"

[directory.users]
U1 = "alice"

[directory.channels]
C1 = "general"
"#;
        let config: KarmacatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        // defaults still apply for unset fields
        assert_eq!(config.bot.console_user, "operator");

        let dir = config.build_directory();
        assert_eq!(dir.user_name("U1").as_deref(), Some("alice"));
        assert_eq!(dir.channel_id("general").as_deref(), Some("C1"));
    }

    #[test]
    fn load_from_missing_path_uses_defaults() {
        let config =
            KarmacatConfig::load_from("/nonexistent/karmacat/config.toml").unwrap();
        assert_eq!(config.bot.console_user, "operator");
        assert!(config.storage.db_path.ends_with("karmacat.db"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = KarmacatConfig::default();
        std::env::set_var("KARMACAT_DB", "/tmp/override.db");
        std::env::set_var("KARMACAT_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.bot.log_level, "trace");

        // Clean up
        std::env::remove_var("KARMACAT_DB");
        std::env::remove_var("KARMACAT_LOG_LEVEL");
    }
}
