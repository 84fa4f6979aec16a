//! Configuration resolution for the API base URL and the log file location.
//!
//! Precedence for the base URL: the `CAMPUS_ADMIN_API_URL` environment
//! variable, then an optional `config.json` in the application data
//! directory, then the built-in default. The data directory also hosts the
//! log file, since the terminal itself belongs to the UI.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".campus-admin";
/// Optional JSON configuration file inside the data directory.
const CONFIG_FILE_NAME: &str = "config.json";
/// Log file written inside the data directory.
const LOG_FILE_NAME: &str = "campus-admin.log";
/// Base URL used when neither the environment nor the config file set one.
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "CAMPUS_ADMIN_API_URL";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub log_file: PathBuf,
}

/// On-disk shape of `config.json`. Every field is optional so a partial
/// file keeps working as knobs are added.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
}

impl Config {
    /// Resolve the configuration, creating the data directory if needed.
    pub fn load() -> Result<Self> {
        let data_dir = data_dir()?;
        fs::create_dir_all(&data_dir).context("failed to create data directory")?;

        let file = read_config_file(&data_dir.join(CONFIG_FILE_NAME))?;
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url,
            log_file: data_dir.join(LOG_FILE_NAME),
        })
    }
}

/// Resolve the application data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Read and parse the optional config file. A missing file is not an error;
/// a malformed one is, so typos do not silently fall back to defaults.
fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}
