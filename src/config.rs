//! Configuration handling for the TUI

use crate::state::forms::DeputyMinistryTable;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API address
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_PHONE_PREFIX: &str = "+93";
const DEFAULT_PHONE_MAX_LENGTH: usize = 12;

const LOG_FILE_NAME: &str = "iums-tui.log";

/// What a uniqueness check that could not complete means for the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationFailureMode {
    /// Treat the value as available
    #[default]
    Open,
    /// Flag the field as unverified
    Closed,
}

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IumsConfig {
    /// IUMS API base URL
    pub api_base_url: Option<String>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Quiet period before a uniqueness check is sent
    pub debounce_ms: Option<u64>,
    /// Outcome of a uniqueness check that failed to complete
    pub validation_failure_mode: Option<ValidationFailureMode>,
    /// Country code every phone number starts with
    pub phone_prefix: Option<String>,
    /// Maximum phone length including the prefix
    pub phone_max_length: Option<usize>,
    /// Deputy ministry names keyed by id
    pub deputy_ministries: Option<BTreeMap<u32, String>>,
}

impl IumsConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "iums", "iums-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Log file under the platform data directory. The terminal belongs to
    /// the UI, so nothing is logged to stderr.
    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "iums", "iums-tui")
            .map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: IumsConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// API base URL: `IUMS_API_URL`, then the file, then the default
    pub fn api_base_url(&self) -> String {
        std::env::var("IUMS_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn validation_failure_mode(&self) -> ValidationFailureMode {
        self.validation_failure_mode.unwrap_or_default()
    }

    pub fn phone_prefix(&self) -> String {
        self.phone_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_PHONE_PREFIX.to_string())
    }

    pub fn phone_max_length(&self) -> usize {
        self.phone_max_length.unwrap_or(DEFAULT_PHONE_MAX_LENGTH)
    }

    /// Deputy ministry table from the file, or the built-in one
    pub fn deputy_ministry_table(&self) -> DeputyMinistryTable {
        match &self.deputy_ministries {
            Some(names) => DeputyMinistryTable::new(names.clone()),
            None => default_deputy_ministries(),
        }
    }
}

fn default_deputy_ministries() -> DeputyMinistryTable {
    [
        (1, "Technical and Sectoral Affairs"),
        (2, "Administration and Finance"),
        (3, "Policy and Planning"),
        (4, "Information Technology"),
    ]
    .into_iter()
    .map(|(id, name)| (id, name.to_string()))
    .collect()
}

/// Open `path` for appending, creating its directory if needed
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
