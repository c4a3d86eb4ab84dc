//! Analysis pipeline contract
//!
//! An analysis plugs into the history walk through a fixed lifecycle:
//!
//! ```text
//! ┌───────────────┐   ┌──────────────┐   ┌──────────────────┐   ┌────────────┐   ┌─────────────┐
//! │ configure()   │──▶│ initialize() │──▶│ consume() × N    │──▶│ finalize() │──▶│ serialize() │
//! │ options+facts │   │ reset state  │   │ one per commit   │   │ once       │   │ text/binary │
//! └───────────────┘   └──────────────┘   └──────────────────┘   └────────────┘   └─────────────┘
//! ```
//!
//! Items declare the per-commit data they need (`requires`), what they hand
//! downstream (`provides`) and their configuration schema. Leaf items end the
//! chain and produce a reportable result. The [`Registry`] maps names and
//! command line flags to item factories.

mod registry;

pub use registry::Registry;

use crate::models::{CommitsByDay, Day, SentimentResult};
use crate::reporters::OutputFormat;
use crate::uast::UastChange;
use anyhow::Result;
use std::collections::HashMap;
use std::io::Write;

/// Per-commit structural changes
pub const DEPENDENCY_UAST_CHANGES: &str = "uast_changes";
/// Per-commit day bucket
pub const DEPENDENCY_DAY: &str = "day";
/// Feature flag for items that need parsed source trees
pub const FEATURE_UAST: &str = "uast";

/// Value type of a configuration option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationOptionType {
    Bool,
    Int,
    Float,
    String,
}

impl std::fmt::Display for ConfigurationOptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationOptionType::Bool => write!(f, "bool"),
            ConfigurationOptionType::Int => write!(f, "int"),
            ConfigurationOptionType::Float => write!(f, "float"),
            ConfigurationOptionType::String => write!(f, "string"),
        }
    }
}

/// A changeable public property of a pipeline item
#[derive(Debug, Clone)]
pub struct ConfigurationOption {
    /// Key inside [`Facts`]
    pub name: &'static str,
    pub description: &'static str,
    /// Command line switch, without the leading dashes
    pub flag: &'static str,
    pub option_type: ConfigurationOptionType,
    pub default: serde_json::Value,
}

/// Configuration handed to [`PipelineItem::configure`]
#[derive(Debug, Clone, Default)]
pub struct Facts {
    /// Option values keyed by [`ConfigurationOption::name`]
    pub options: HashMap<String, serde_json::Value>,
    /// Commit hashes of every day, precomputed by the history walk
    pub commits_by_day: CommitsByDay,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option value
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_commits_by_day(mut self, commits_by_day: CommitsByDay) -> Self {
        self.commits_by_day = commits_by_day;
        self
    }

    /// Get a typed option value
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get an option with a default value
    pub fn get_option_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_option(key).unwrap_or(default)
    }
}

/// Data of one commit, as requested through [`PipelineItem::requires`]
#[derive(Debug, Clone, Copy)]
pub struct CommitDeps<'a> {
    pub hash: &'a str,
    pub day: Day,
    pub changes: &'a [UastChange],
}

/// Result of a leaf item's finalize step
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Sentiment(SentimentResult),
}

impl AnalysisResult {
    pub fn as_sentiment(&self) -> Option<&SentimentResult> {
        match self {
            AnalysisResult::Sentiment(r) => Some(r),
        }
    }
}

/// A stage of the per-commit pipeline
pub trait PipelineItem: Send {
    /// Unique name, used as registry key and report section
    fn name(&self) -> &'static str;

    /// Entities produced for downstream items
    fn provides(&self) -> Vec<&'static str>;

    /// Entities needed from upstream on every commit
    fn requires(&self) -> Vec<&'static str>;

    /// Features which must be enabled for this item to run
    fn features(&self) -> Vec<&'static str> {
        vec![]
    }

    /// Configuration schema
    fn configuration_options(&self) -> Vec<ConfigurationOption> {
        vec![]
    }

    /// Apply configuration. Invalid values are corrected, not rejected.
    fn configure(&mut self, facts: &Facts) -> Result<()>;

    /// Reset temporary state before a series of `consume` calls
    fn initialize(&mut self) -> Result<()>;

    /// Process the next commit
    fn consume(&mut self, deps: &CommitDeps<'_>) -> Result<()>;
}

/// A pipeline item that produces a final report
pub trait LeafPipelineItem: PipelineItem {
    /// Command line switch that activates the analysis
    fn flag(&self) -> &'static str;

    /// Produce the result. Further `consume` calls are not expected.
    fn finalize(&mut self) -> Result<AnalysisResult>;

    /// Write a result returned by `finalize`
    fn serialize(
        &self,
        result: &AnalysisResult,
        format: OutputFormat,
        writer: &mut dyn Write,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_facts_typed_options() {
        let facts = Facts::new()
            .with_option("A.Int", json!(12))
            .with_option("A.Float", json!(0.25))
            .with_option("A.Str", json!("x"));

        assert_eq!(facts.get_option::<i64>("A.Int"), Some(12));
        assert_eq!(facts.get_option::<f32>("A.Float"), Some(0.25));
        assert_eq!(facts.get_option::<String>("A.Str"), Some("x".to_string()));
        assert_eq!(facts.get_option::<i64>("A.Str"), None);
        assert_eq!(facts.get_option_or("missing", 7), 7);
    }

    #[test]
    fn test_option_type_display() {
        assert_eq!(ConfigurationOptionType::Float.to_string(), "float");
        assert_eq!(ConfigurationOptionType::Int.to_string(), "int");
    }
}
