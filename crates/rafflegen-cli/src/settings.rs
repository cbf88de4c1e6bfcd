use std::io;
use std::path::{Path, PathBuf};

use rafflegen_generate::{AccountCounts, GenerateOptions, GenerationError, write_bytes_atomic};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SETTINGS_PATH: &str = "rafflegen.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("write error: {0}")]
    Write(#[from] GenerationError),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountTypesEnabled {
    pub blank: bool,
    pub roster: bool,
    pub mail: bool,
    pub mixed: bool,
}

impl Default for AccountTypesEnabled {
    fn default() -> Self {
        Self {
            blank: true,
            roster: true,
            mail: true,
            mixed: true,
        }
    }
}

/// Generator defaults persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub default_ticket_cost: i64,
    pub roster_entries_per_account: u32,
    pub mail_entries_per_account: u32,
    pub default_output_filename: String,
    pub account_types_enabled: AccountTypesEnabled,
    pub account_counts: AccountCounts,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            default_ticket_cost: 1000,
            roster_entries_per_account: 10,
            mail_entries_per_account: 10,
            default_output_filename: "RaffleManager_Generated.lua".to_string(),
            account_types_enabled: AccountTypesEnabled::default(),
            account_counts: AccountCounts {
                blank: 5,
                roster: 10,
                mail: 15,
                mixed: 20,
            },
        }
    }
}

impl GeneratorSettings {
    /// Remember the values of a successful run.
    pub fn record_run(&mut self, options: &GenerateOptions, filename: &str) {
        let counts = options.counts;
        self.default_ticket_cost = options.ticket_cost;
        self.roster_entries_per_account = options.roster_entries;
        self.mail_entries_per_account = options.mail_entries;
        self.default_output_filename = filename.to_string();
        self.account_types_enabled = AccountTypesEnabled {
            blank: counts.blank > 0,
            roster: counts.roster > 0,
            mail: counts.mail > 0,
            mixed: counts.mixed > 0,
        };
        self.account_counts = counts;
    }
}

pub fn load_or_create_settings(path: &Path) -> SettingsResult<GeneratorSettings> {
    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: GeneratorSettings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = GeneratorSettings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &GeneratorSettings) -> SettingsResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(path, encoded.as_bytes()).map_err(SettingsError::from)
}

pub fn reset_settings(path: &Path) -> SettingsResult<GeneratorSettings> {
    let settings = GeneratorSettings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}
