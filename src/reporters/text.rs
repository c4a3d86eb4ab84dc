//! Text reporter
//!
//! One line per day, ascending:
//! `  <day>: [<score>, [<hash>,<hash>], "<comment>|<comment>"]`

use crate::models::SentimentResult;
use anyhow::{Context, Result};
use std::io::Write;

/// Render result as text lines
pub fn render(result: &SentimentResult) -> String {
    let mut out = String::new();
    for (day, sentiment) in &result.days {
        out.push_str(&format!(
            "  {}: [{:.4}, [{}], \"{}\"]\n",
            day,
            sentiment.score,
            sentiment.commits.join(","),
            sentiment.comments.join("|")
        ));
    }
    out
}

pub fn write(result: &SentimentResult, writer: &mut dyn Write) -> Result<()> {
    writer
        .write_all(render(result).as_bytes())
        .context("Failed to write text report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_text_lines() {
        let text = render(&test_result());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "  0: [0.1250, [1111111111111111111111111111111111111111], \"This loop is horribly slow\"]"
        );
        assert_eq!(
            lines[1],
            "  12: [0.9000, [2222222222222222222222222222222222222222,3333333333333333333333333333333333333333], \"Great trick borrowed from the old parser|Works nicely with the cache\"]"
        );
        assert!(text.ends_with("\"]\n"));
    }

    #[test]
    fn test_empty_result_renders_nothing() {
        assert_eq!(render(&SentimentResult::new()), "");
    }

    #[test]
    fn test_day_without_commits() {
        let mut result = test_result();
        result.days.get_mut(&0).expect("day 0").commits.clear();
        assert!(render(&result).starts_with("  0: [0.1250, [], "));
    }
}
