//! User-level configuration
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/commit-sentiment/config.toml

use super::project_config::{load_toml_config, ConfigFile};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Overrides the scorer URL of every file layer
pub const ENV_SCORER_URL: &str = "COMMIT_SENTIMENT_SCORER_URL";

/// Get the user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("commit-sentiment").join("config.toml"))
}

/// Load the user config file, if present and valid
pub fn load_user_config() -> ConfigFile {
    let Some(path) = user_config_path().filter(|p| p.exists()) else {
        return ConfigFile::default();
    };
    match load_toml_config(&path) {
        Ok(config) => {
            debug!("Loaded user config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            ConfigFile::default()
        }
    }
}

/// Configuration carried by environment variables
pub fn env_config() -> ConfigFile {
    let mut config = ConfigFile::default();
    if let Ok(url) = std::env::var(ENV_SCORER_URL) {
        if !url.is_empty() {
            config.scorer.url = Some(url);
        }
    }
    config
}
