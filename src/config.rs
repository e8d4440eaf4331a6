//! Persistent CLI configuration model and file-backed manager.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// How `password` in the config file is to be turned into the real secret.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordType {
    #[default]
    Plain,
    Pass,
    Gpg,
    Keyring,
}

fn default_true() -> bool {
    true
}

fn default_working_days() -> u32 {
    5
}

fn default_hours_per_day() -> f64 {
    7.5
}

fn default_hours_per_week() -> f64 {
    37.5
}

fn default_holiday_api_url() -> String {
    jira_api::config::DEFAULT_HOLIDAY_API.to_string()
}

/// Settings read from `config.json`; every field has a default so partial files load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub jira_url: String,
    pub username: String,
    pub password: String,
    pub password_type: PasswordType,
    #[serde(default = "default_true")]
    pub use_timesheet_plugin: bool,
    #[serde(default = "default_working_days")]
    pub number_of_working_days: u32,
    #[serde(default = "default_hours_per_day")]
    pub working_hours_per_day: f64,
    #[serde(default = "default_hours_per_week")]
    pub working_hours_per_week: f64,
    pub country_code: Option<String>,
    #[serde(default = "default_holiday_api_url")]
    pub holiday_api_url: String,
    /// Lower-cased alias to issue key.
    pub aliases: BTreeMap<String, String>,
    pub sprint_filter: Option<String>,
    pub comment_visibility: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_url: String::new(),
            username: String::new(),
            password: String::new(),
            password_type: PasswordType::default(),
            use_timesheet_plugin: default_true(),
            number_of_working_days: default_working_days(),
            working_hours_per_day: default_hours_per_day(),
            working_hours_per_week: default_hours_per_week(),
            country_code: None,
            holiday_api_url: default_holiday_api_url(),
            aliases: BTreeMap::new(),
            sprint_filter: None,
            comment_visibility: None,
        }
    }
}

impl Config {
    /// Issue key for `alias`, matched case-insensitively.
    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        let wanted = alias.to_lowercase();
        self.aliases
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, key)| key.as_str())
    }

    pub fn require_server(&self) -> Result<&str> {
        let url = self.jira_url.trim();
        if url.is_empty() {
            Err(CliError::Config(
                "jira_url is not set in config.json".to_string(),
            ))
        } else {
            Ok(url)
        }
    }
}

/// Loads and saves `config.json` inside the configuration directory.
pub struct ConfigManager {
    dir: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `override_dir` when given, otherwise the platform config directory.
    pub fn new(override_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match override_dir {
            Some(dir) => dir,
            None => directories::ProjectDirs::from("", "", "jira-cli")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    CliError::Config("could not determine config directory".to_string())
                })?,
        };
        Ok(Self::in_dir(dir))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(CONFIG_FILE_NAME);
        Self { dir, path }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file gives defaults; unreadable or invalid JSON is an error.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|err| {
            CliError::Config(format!("invalid {}: {err}", self.path.display()))
        })
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(config)
            .map_err(|err| CliError::Config(err.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
