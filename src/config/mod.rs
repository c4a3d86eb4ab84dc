//! Configuration module
//!
//! Settings are layered, highest priority first:
//! 1. Command line flags (applied by the CLI on the resolved [`Config`])
//! 2. Environment (`COMMIT_SENTIMENT_SCORER_URL`)
//! 3. Project file in the repository root (`commit-sentiment.toml` or
//!    `.commit-sentiment.json`)
//! 4. User file (`~/.config/commit-sentiment/config.toml`)
//! 5. Built-in defaults

mod project_config;
mod user_config;

pub use project_config::{
    load_project_config, ConfigFile, HistorySection, ScorerSection, SentimentSection,
    PROJECT_JSON, PROJECT_TOML,
};
pub use user_config::{env_config, load_user_config, user_config_path, ENV_SCORER_URL};

use crate::git::HistoryOptions;
use crate::pipeline::Facts;
use crate::scoring::{ScorerBackend, DEFAULT_TIMEOUT_SECS};
use crate::sentiment::{CONFIG_GAP, CONFIG_MIN_LENGTH, DEFAULT_GAP, DEFAULT_MIN_COMMENT_LENGTH};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Comment filtering and deadzone settings
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentConfig {
    pub min_comment_length: usize,
    pub gap: f32,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            min_comment_length: DEFAULT_MIN_COMMENT_LENGTH,
            gap: DEFAULT_GAP,
        }
    }
}

/// Scorer backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    pub backend: ScorerBackend,
    /// Service URL for the `http` backend
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            backend: ScorerBackend::default(),
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ScorerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub sentiment: SentimentConfig,
    pub scorer: ScorerConfig,
    pub history: HistoryOptions,
}

impl Config {
    /// Resolve every file and environment layer for a repository
    pub fn load(repo_path: &Path) -> Self {
        let mut layers = load_user_config();
        layers.merge(load_project_config(repo_path));
        layers.merge(env_config());
        Self::from_layers(layers)
    }

    /// Apply a merged layer on top of the built-in defaults
    pub fn from_layers(layers: ConfigFile) -> Self {
        let mut config = Config::default();
        config.apply(layers);
        config
    }

    /// Apply the set keys of a layer
    pub fn apply(&mut self, layer: ConfigFile) {
        let ConfigFile {
            sentiment,
            scorer,
            history,
        } = layer;

        if let Some(v) = sentiment.min_comment_length {
            self.sentiment.min_comment_length = v;
        }
        if let Some(v) = sentiment.gap {
            self.sentiment.gap = v;
        }

        if let Some(backend) = scorer.backend {
            match backend.parse() {
                Ok(b) => self.scorer.backend = b,
                Err(e) => warn!("{}, keeping '{}'", e, self.scorer.backend),
            }
        }
        if scorer.url.is_some() {
            self.scorer.url = scorer.url;
        }
        if let Some(v) = scorer.timeout_secs {
            self.scorer.timeout_secs = v;
        }

        if let Some(v) = history.max_commits {
            self.history.max_commits = v;
        }
        if let Some(v) = history.first_parent {
            self.history.first_parent = v;
        }
        if let Some(v) = history.max_file_size {
            self.history.max_file_size = v;
        }
    }

    /// Pipeline options for the sentiment analysis.
    ///
    /// Values are passed through unchanged; the analysis clamps them.
    pub fn facts(&self) -> Facts {
        Facts::new()
            .with_option(CONFIG_MIN_LENGTH, json!(self.sentiment.min_comment_length))
            .with_option(CONFIG_GAP, json!(self.sentiment.gap))
    }
}
