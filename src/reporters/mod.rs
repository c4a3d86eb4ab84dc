//! Output reporters for sentiment results
//!
//! Supports multiple output formats:
//! - `text` - one YAML-ish line per day
//! - `binary` - length-prefixed bitcode message
//! - `json` - machine-readable JSON

mod binary;
mod json;
mod text;

pub use binary::{decode, encode, read_binary, CommentSentimentResults, Sentiment};

use crate::models::SentimentResult;
use anyhow::{anyhow, Result};
use std::io::Write;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Binary,
    Json,
}

impl OutputFormat {
    pub fn is_binary(&self) -> bool {
        matches!(self, OutputFormat::Binary)
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "yaml" => Ok(OutputFormat::Text),
            "binary" | "bin" | "pb" => Ok(OutputFormat::Binary),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, binary, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Binary => write!(f, "binary"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Write a sentiment result in the specified format
pub fn write_result(
    result: &SentimentResult,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Text => text::write(result, writer),
        OutputFormat::Binary => binary::write(result, writer),
        OutputFormat::Json => json::write(result, writer),
    }
}

/// Render a sentiment result to a string (text and JSON only)
pub fn report(result: &SentimentResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render(result)),
        OutputFormat::Json => json::render(result),
        OutputFormat::Binary => Err(anyhow!("binary output cannot be rendered as a string")),
    }
}
