use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Overrides the application home directory (config, journal and backups).
pub const HOME_ENV_VAR: &str = "CDJOURNAL_HOME";

const HOME_DIR_NAME: &str = ".cdjournal";

/// Stores user-configurable preferences and session metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the journal document. Defaults to the application home.
    pub data_dir: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default = "Config::default_autosave")]
    pub autosave: bool,
    /// Seed the starter chart of accounts into brand-new documents.
    #[serde(default = "Config::default_seed_accounts")]
    pub seed_default_accounts: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Month last viewed, as `YYYY-MM`.
    pub last_period: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
            backup_retention: Self::default_backup_retention(),
            autosave: Self::default_autosave(),
            seed_default_accounts: Self::default_seed_accounts(),
            last_period: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_autosave() -> bool {
        true
    }

    pub fn default_seed_accounts() -> bool {
        true
    }

    /// `$CDJOURNAL_HOME`, else `~/.cdjournal`.
    pub fn home_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR_NAME)
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(Self::home_dir)
    }

    pub fn resolve_backup_dir(&self) -> PathBuf {
        self.resolve_data_dir().join("backups")
    }
}
