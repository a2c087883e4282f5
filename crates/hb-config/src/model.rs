use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Stores user-configurable preferences for the budget shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_currency_precision")]
    pub currency_precision: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the entry file. Defaults to `<home>/data`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_true")]
    pub seed_sample_data: bool,
    #[serde(default = "Config::default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            currency_precision: Self::default_currency_precision(),
            data_dir: None,
            seed_sample_data: true,
            sample_size: Self::default_sample_size(),
            ui_color_enabled: true,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 7] = [
        "currency",
        "currency_precision",
        "data_dir",
        "seed_sample_data",
        "sample_size",
        "ui_color_enabled",
        "backup_retention",
    ];

    fn default_currency() -> String {
        "USD".into()
    }

    fn default_currency_precision() -> u8 {
        2
    }

    fn default_true() -> bool {
        true
    }

    fn default_sample_size() -> usize {
        1000
    }

    fn default_backup_retention() -> usize {
        5
    }

    /// Platform directory used when no explicit home is given.
    pub fn default_base_dir() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("homebudget")
    }

    /// Directory holding `entries.json` and its backups.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    /// Number of sample entries to seed into an empty store, zero when disabled.
    pub fn effective_sample_size(&self) -> usize {
        if self.seed_sample_data {
            self.sample_size
        } else {
            0
        }
    }

    /// Renders a single setting for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "currency" => self.currency.clone(),
            "currency_precision" => self.currency_precision.to_string(),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "default".into()),
            "seed_sample_data" => self.seed_sample_data.to_string(),
            "sample_size" => self.sample_size.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "backup_retention" => self.backup_retention.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "currency" => {
                let code = value.trim().to_ascii_uppercase();
                if code.is_empty() {
                    return Err(invalid());
                }
                self.currency = code;
            }
            "currency_precision" => {
                let precision: u8 = value.trim().parse().map_err(|_| invalid())?;
                if precision > 6 {
                    return Err(invalid());
                }
                self.currency_precision = precision;
            }
            "data_dir" => {
                let trimmed = value.trim();
                self.data_dir = if trimmed.is_empty() || trimmed == "default" {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
            }
            "seed_sample_data" => self.seed_sample_data = parse_bool(value).ok_or_else(invalid)?,
            "sample_size" => self.sample_size = value.trim().parse().map_err(|_| invalid())?,
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(value).ok_or_else(invalid)?,
            "backup_retention" => {
                let retention: usize = value.trim().parse().map_err(|_| invalid())?;
                self.backup_retention = retention.max(1);
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
