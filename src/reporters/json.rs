//! JSON reporter
//!
//! Outputs the day map as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::models::SentimentResult;
use anyhow::{Context, Result};
use std::io::Write;

/// Render result as JSON
pub fn render(result: &SentimentResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn write(result: &SentimentResult, writer: &mut dyn Write) -> Result<()> {
    let mut json = render(result)?;
    json.push('\n');
    writer
        .write_all(json.as_bytes())
        .context("Failed to write JSON report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_json_render_valid() {
        let json_str = render(&test_result()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(
            parsed["days"]["12"]["comments"]
                .as_array()
                .expect("comments array")
                .len(),
            2
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let json_str = render(&test_result()).expect("render JSON");
        let back: SentimentResult = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(back, test_result());
    }
}
