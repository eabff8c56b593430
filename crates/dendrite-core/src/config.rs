//! Persisted config (vault root, Ollama overrides) in the app data
//! directory. User notes stay in the vault folder they choose; only app
//! state lives here.
//!
//! The engine itself never reads config ambiently: the vault root is passed
//! explicitly into every route and persist call. Only the CLI consults this
//! module to resolve what to pass.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "config.toml";

/// Returns the directory where dendrite keeps its config and other app
/// data, creating it on first use. `None` when the platform gives us no
/// usable home directory.
pub fn app_data_dir() -> Option<PathBuf> {
    let dir = directories::ProjectDirs::from("app", "Dendrite", "Dendrite")?
        .data_local_dir()
        .to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to the user's vault directory (chosen by them).
    pub vault_root: Option<String>,
    /// Base URL of the local Ollama instance, if not the default.
    pub ollama_url: Option<String>,
    /// Completion model for escalated questions, if not the default.
    pub ollama_model: Option<String>,
}

/// Load config from the app data directory. Returns default config if
/// missing or invalid.
pub fn load_config() -> Config {
    let Some(data_dir) = app_data_dir() else {
        return Config::default();
    };
    let path = data_dir.join(CONFIG_FILENAME);
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    toml::from_str(&s).unwrap_or_default()
}

/// Save config to the app data directory.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let data_dir = app_data_dir().ok_or(ConfigError::NoDataDir)?;
    let path = data_dir.join(CONFIG_FILENAME);
    let s = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(&path, s).map_err(ConfigError::Write)
}

/// Get the configured vault root path, if any.
pub fn get_vault_root() -> Option<PathBuf> {
    load_config()
        .vault_root
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Set and persist the vault root.
pub fn set_vault_root(path: &Path) -> Result<(), ConfigError> {
    let path = path.canonicalize().map_err(ConfigError::Canonicalize)?;
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path));
    }
    let mut config = load_config();
    config.vault_root = Some(path.to_string_lossy().into_owned());
    save_config(&config)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine app data directory")]
    NoDataDir,
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(std::io::Error),
    #[error("failed to resolve path: {0}")]
    Canonicalize(std::io::Error),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_is_some() {
        assert!(app_data_dir().is_some());
    }
}
