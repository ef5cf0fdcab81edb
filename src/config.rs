use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::calendar::DEFAULT_UPCOMING_DAYS;
use crate::error::ConfigError;
use crate::notify::DEFAULT_LEAD_MINUTES;

pub const APP_NAME: &str = "reminders-tui";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database: PathBuf,
    pub log_dir: PathBuf,
    pub event_lead_minutes: u32,
    pub upcoming_days: u32,
    pub notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data = data_dir();
        Self {
            database: data.join("reminders.db"),
            log_dir: data.join("logs"),
            event_lead_minutes: DEFAULT_LEAD_MINUTES,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            notifications: true,
        }
    }
}

impl Config {
    /// Load `config.toml` from the user config directory, or defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.into_config())
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    event_lead_minutes: Option<u32>,
    upcoming_days: Option<u32>,
    notifications: Option<bool>,
}

impl ConfigFile {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            database: self.database.unwrap_or(defaults.database),
            log_dir: self.log_dir.unwrap_or(defaults.log_dir),
            event_lead_minutes: self.event_lead_minutes.unwrap_or(defaults.event_lead_minutes),
            upcoming_days: self.upcoming_days.unwrap_or(defaults.upcoming_days),
            notifications: self.notifications.unwrap_or(defaults.notifications),
        }
    }
}
