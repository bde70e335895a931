use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ClientConfig;

pub const BASE_URL_ENV: &str = "TASKBOARD_BASE_URL";

/// Error type for loading client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no API base url: pass --base-url, set TASKBOARD_BASE_URL, or add [api] base_url to {}", .config_path.display())]
    MissingBaseUrl { config_path: PathBuf },
}

/// Directory under `$XDG_CONFIG_HOME` (or `~/.config`)
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("taskboard")
}

/// Directory under `$XDG_STATE_HOME` (or `~/.local/state`)
pub fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("state"))
        .join("taskboard")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Load the config. An explicit path must exist; a missing default file
/// yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = default_config_path();
            if path.exists() {
                read_config(&path)
            } else {
                Ok(ClientConfig::default())
            }
        }
    }
}

pub fn read_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the base URL: flag, then environment, then file
pub fn resolve_base_url(
    flag: Option<&str>,
    env: Option<&str>,
    config: &ClientConfig,
    config_path: &Path,
) -> Result<String, ConfigError> {
    [flag, env, config.api.base_url.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingBaseUrl {
            config_path: config_path.to_path_buf(),
        })
}

/// Read the base URL override from the environment
pub fn env_base_url() -> Option<String> {
    std::env::var(BASE_URL_ENV).ok()
}
