//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Fixed path of the verification endpoint, appended to the base URL.
pub const VERIFICATION_PATH: &str = "/process-image-and-store/";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `API_URL` (optional): verification service base URL, defaults to `http://103.246.85.252:8000`
/// - `STORAGE_PATH` (optional): JSON file backing client storage, defaults to the platform data dir
/// - `REQUEST_TIMEOUT_SECS` (optional): per-request timeout, unset or 0 means wait indefinitely
/// - `KEY_NAME` (optional): label given to issued API keys, defaults to `Default API Key`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_key_name")]
    pub key_name: String,
}

/// Default base URL if API_URL environment variable is not set.
fn default_api_url() -> String {
    "http://103.246.85.252:8000".to_string()
}

fn default_key_name() -> String {
    "Default API Key".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            storage_path: None,
            request_timeout_secs: None,
            key_name: default_key_name(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// its expected type (e.g., a non-numeric REQUEST_TIMEOUT_SECS).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are converted automatically: api_url -> API_URL
        envy::from_env::<Config>()
    }

    /// Full URL of the verification endpoint.
    pub fn verification_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), VERIFICATION_PATH)
    }

    /// Resolve where the client storage file lives.
    ///
    /// Priority:
    /// 1. `STORAGE_PATH`
    /// 2. Platform-specific app data dir (`~/.local/share/student-verify/`, etc.)
    pub fn resolve_storage_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.storage_path {
            return Some(path.clone());
        }

        ProjectDirs::from("", "", "student-verify")
            .map(|dirs| dirs.data_dir().join("local_storage.json"))
    }
}
