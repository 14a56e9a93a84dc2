//! Application configuration
//!
//! The data directory holds the SQLite file and `sync_config.json`, the
//! hosted-backend settings. Environment variables (optionally from a `.env`
//! file) override both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_DIR_NAME: &str = "tickdo";
pub const DB_FILE_NAME: &str = "tickdo.db";
pub const SYNC_CONFIG_FILE_NAME: &str = "sync_config.json";

pub const ENV_DATA_DIR: &str = "TICKDO_DATA_DIR";
pub const ENV_SUPABASE_URL: &str = "TICKDO_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "TICKDO_SUPABASE_ANON_KEY";
pub const ENV_ACCESS_TOKEN: &str = "TICKDO_ACCESS_TOKEN";

/// Hosted backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
    /// Signed-in user's JWT; the anon key is sent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    /// Resolve configuration from environment variables (looked up through
    /// `env`) and the sync settings stored in the data dir
    pub fn resolve(env: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let data_dir = match env(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let mut config = Self::from_data_dir(data_dir);
        config.apply_env(env);
        Ok(config)
    }

    /// Configuration stored in a data directory, without environment overrides
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let db_path = data_dir.join(DB_FILE_NAME);
        let remote = get_sync_config(&db_path);
        Self { data_dir, db_path, remote }
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let url = env(ENV_SUPABASE_URL).filter(|v| !v.is_empty());
        let key = env(ENV_SUPABASE_ANON_KEY).filter(|v| !v.is_empty());
        let token = env(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty());

        match (url, key, self.remote.take()) {
            (Some(url), Some(anon_key), _) => {
                self.remote = Some(RemoteConfig { url, anon_key, access_token: token });
            }
            (url, key, Some(mut saved)) => {
                if let Some(url) = url {
                    saved.url = url;
                }
                if let Some(key) = key {
                    saved.anon_key = key;
                }
                if token.is_some() {
                    saved.access_token = token;
                }
                self.remote = Some(saved);
            }
            (Some(_), None, None) | (None, Some(_), None) => {
                log::warn!(
                    "Ignoring partial backend settings: both {} and {} are required",
                    ENV_SUPABASE_URL,
                    ENV_SUPABASE_ANON_KEY
                );
            }
            (None, None, None) => {}
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }
}

/// Merge a `.env` file from the working directory into the process environment
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }
}

fn default_data_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| format!("No platform data directory; set {}", ENV_DATA_DIR))
}

fn sync_config_path(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .map(|dir| dir.join(SYNC_CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(SYNC_CONFIG_FILE_NAME))
}

/// Read the saved backend settings next to the database, if any
pub fn get_sync_config(db_path: &Path) -> Option<RemoteConfig> {
    let path = sync_config_path(db_path);
    let text = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", path.display(), e);
            None
        }
    }
}

/// Persist backend settings next to the database
pub fn save_sync_config(db_path: &Path, config: &RemoteConfig) -> Result<(), String> {
    let path = sync_config_path(db_path);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Forget the backend settings; missing file is not an error
pub fn clear_sync_config(db_path: &Path) -> Result<(), String> {
    let path = sync_config_path(db_path);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("Failed to remove {}: {}", path.display(), e)),
    }
}
