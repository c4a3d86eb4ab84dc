//! Noise filter for merged comments
//!
//! Heuristics that strip or reject comments unlikely to be prose: docstring
//! markup, embedded code, license headers. The steps run in a fixed order
//! because each one sees the text produced by the previous one.

use regex::Regex;
use std::sync::OnceLock;

/// Minimum share of ASCII letters in a cleaned comment
pub const COMMENT_LETTERS_RATIO: f32 = 0.6;

static FILTERED_CHARS: OnceLock<Regex> = OnceLock::new();
static LETTERS: OnceLock<Regex> = OnceLock::new();
static FUNCTION_NAME: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static LICENSE: OnceLock<Regex> = OnceLock::new();

fn filtered_chars() -> &'static Regex {
    FILTERED_CHARS.get_or_init(|| {
        Regex::new(r"[^-a-zA-Z0-9_:;,./?!#&%+*=\n \t()]+").expect("valid regex")
    })
}

fn letters() -> &'static Regex {
    LETTERS.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("valid regex"))
}

fn function_name() -> &'static Regex {
    FUNCTION_NAME
        .get_or_init(|| Regex::new(r"\s*[a-zA-Z_][a-zA-Z_0-9]*\(\)").expect("valid regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn license() -> &'static Regex {
    LICENSE.get_or_init(|| {
        Regex::new(r"(?i)[li\[cs]en[cs][ei]|copyright|©").expect("valid regex")
    })
}

/// Clean a single merged comment, or reject it with `None`.
pub fn clean_comment(comment: &str, min_length: usize) -> Option<String> {
    let comment = comment.trim();
    // docstrings and structured markup start with a symbol
    match comment.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return None,
    }

    let comment = function_name().replace_all(comment, "");
    let comment = filtered_chars().replace_all(&comment, "");
    if comment.len() < min_length {
        return None;
    }

    let comment = whitespace().replace_all(&comment, " ");

    let letter_count: usize = letters().find_iter(&comment).map(|m| m.len()).sum();
    if letter_count < (comment.len() as f32 * COMMENT_LETTERS_RATIO) as usize {
        return None;
    }

    if license().is_match(&comment) {
        return None;
    }

    Some(comment.into_owned())
}

/// Apply [`clean_comment`] to every merged comment, keeping order.
pub fn filter_comments<I, S>(comments: I, min_length: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    comments
        .into_iter()
        .filter_map(|c| clean_comment(c.as_ref(), min_length))
        .collect()
}
