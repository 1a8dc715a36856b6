//! Application settings persistence for Tradebook.
//!
//! Stores user preferences (backend URL, cache location, theme) in a JSON
//! file at an OS-appropriate location.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the stored backend URL.
pub const BACKEND_URL_ENV: &str = "TRADEBOOK_BACKEND_URL";

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Base URL of the entries API.
    pub backend_url: String,
    /// SQLite file holding the local fallback snapshot.
    pub cache_path: String,
    pub dark_mode: bool,
    pub request_timeout_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            cache_path: default_cache_path().to_string_lossy().to_string(),
            dark_mode: true,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn apply_env(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url;
        }
        self
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/tradebook/settings.json`
/// - Windows: `%APPDATA%/Tradebook/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Tradebook").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("tradebook").join("settings.json")
    }
}

/// Returns the default cache database path: `<data dir>/tradebook/cache.db`.
pub fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tradebook")
        .join("cache.db")
}

/// Loads settings from disk; returns defaults if the file is missing or corrupt.
///
/// [`BACKEND_URL_ENV`] takes precedence over the stored backend URL.
pub fn load_settings() -> AppSettings {
    load_settings_from(&settings_file_path()).apply_env(std::env::var(BACKEND_URL_ENV).ok())
}

/// Like [`load_settings`] but reads `path` and ignores the environment.
pub fn load_settings_from(path: &Path) -> AppSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt settings file {}: {e}", path.display());
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

/// Saves settings to disk, creating parent directories as needed.
pub fn save_settings(settings: &AppSettings) -> Result<()> {
    save_settings_to(&settings_file_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
