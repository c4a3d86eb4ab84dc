//! Project-level configuration
//!
//! Loaded from `commit-sentiment.toml` (preferred) or `.commit-sentiment.json`
//! in the repository root. Every key is optional; unset keys fall through to
//! the next layer.
//!
//! ```toml
//! [sentiment]
//! min_comment_length = 20
//! gap = 0.5
//!
//! [scorer]
//! backend = "http"
//! url = "http://localhost:8000/sentiment"
//! timeout_secs = 300
//!
//! [history]
//! max_commits = 0
//! first_parent = true
//! max_file_size = 1048576
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub const PROJECT_TOML: &str = "commit-sentiment.toml";
pub const PROJECT_JSON: &str = ".commit-sentiment.json";

/// One configuration layer as written in a file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFile {
    pub sentiment: SentimentSection,
    pub scorer: ScorerSection,
    pub history: HistorySection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SentimentSection {
    pub min_comment_length: Option<usize>,
    pub gap: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScorerSection {
    /// `lexicon` or `http`
    pub backend: Option<String>,
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistorySection {
    pub max_commits: Option<usize>,
    pub first_parent: Option<bool>,
    pub max_file_size: Option<u64>,
}

impl ConfigFile {
    /// Overlay `other` on top of this layer (other takes priority)
    pub fn merge(&mut self, other: ConfigFile) {
        let ConfigFile {
            sentiment,
            scorer,
            history,
        } = other;

        if sentiment.min_comment_length.is_some() {
            self.sentiment.min_comment_length = sentiment.min_comment_length;
        }
        if sentiment.gap.is_some() {
            self.sentiment.gap = sentiment.gap;
        }
        if scorer.backend.is_some() {
            self.scorer.backend = scorer.backend;
        }
        if scorer.url.is_some() {
            self.scorer.url = scorer.url;
        }
        if scorer.timeout_secs.is_some() {
            self.scorer.timeout_secs = scorer.timeout_secs;
        }
        if history.max_commits.is_some() {
            self.history.max_commits = history.max_commits;
        }
        if history.first_parent.is_some() {
            self.history.first_parent = history.first_parent;
        }
        if history.max_file_size.is_some() {
            self.history.max_file_size = history.max_file_size;
        }
    }
}

/// Load project configuration from the repository root.
///
/// A file that fails to parse is reported and skipped.
pub fn load_project_config(repo_path: &Path) -> ConfigFile {
    // Try TOML first (preferred format)
    let toml_path = repo_path.join(PROJECT_TOML);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    // Try JSON
    let json_path = repo_path.join(PROJECT_JSON);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ConfigFile::default()
}

/// Load configuration from a TOML file
pub fn load_toml_config(path: &Path) -> anyhow::Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config: ConfigFile = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        assert_eq!(load_project_config(dir.path()), ConfigFile::default());
    }

    #[test]
    fn test_load_toml() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_TOML),
            "[sentiment]\ngap = 0.3\n\n[history]\nfirst_parent = false\n",
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.sentiment.gap, Some(0.3));
        assert_eq!(config.sentiment.min_comment_length, None);
        assert_eq!(config.history.first_parent, Some(false));
    }

    #[test]
    fn test_load_json_when_no_toml() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_JSON),
            r#"{"scorer": {"backend": "http", "url": "http://scorer:9000/"}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.scorer.backend.as_deref(), Some("http"));
        assert_eq!(config.scorer.url.as_deref(), Some("http://scorer:9000/"));
    }

    #[test]
    fn test_broken_toml_falls_back_to_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_TOML), "[sentiment\ngap = ").unwrap();
        std::fs::write(
            dir.path().join(PROJECT_JSON),
            r#"{"sentiment": {"min_comment_length": 40}}"#,
        )
        .unwrap();

        let config = load_project_config(dir.path());
        assert_eq!(config.sentiment.min_comment_length, Some(40));
    }

    #[test]
    fn test_merge_prefers_set_values() {
        let mut base = ConfigFile::default();
        base.sentiment.gap = Some(0.2);
        base.scorer.timeout_secs = Some(10);

        let mut top = ConfigFile::default();
        top.sentiment.gap = Some(0.7);
        top.history.max_commits = Some(50);

        base.merge(top);
        assert_eq!(base.sentiment.gap, Some(0.7));
        assert_eq!(base.scorer.timeout_secs, Some(10));
        assert_eq!(base.history.max_commits, Some(50));
    }
}
