//! Batch sentiment scoring
//!
//! The scorer is a black box from an ordered list of texts to an equally long
//! list of scores in [0, 1], where 0 is most negative and 1 most positive.
//! It is invoked exactly once per analysis and fails as a whole.
//!
//! Backends:
//! - `http` - a remote classification service, one JSON request per batch
//! - `lexicon` - an offline word-list scorer, used when no service is configured

mod http;
mod lexicon;

pub use http::{HttpScorer, DEFAULT_TIMEOUT_SECS};
pub use lexicon::LexiconScorer;

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Progress callback, called with `(done, total)`
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Errors raised by a scorer backend
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Scoring request failed: {0}")]
    RequestFailed(String),

    #[error("Scoring service error: {status} - {message}")]
    ServiceError { status: u16, message: String },

    #[error("Failed to parse scoring response: {0}")]
    ParseError(String),

    #[error("Scorer returned {actual} scores for {expected} texts")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Score {score} at position {position} is outside [0, 1]")]
    OutOfRange { position: usize, score: f32 },

    #[error("Invalid scorer configuration: {0}")]
    ConfigError(String),
}

pub type ScorerResult<T> = Result<T, ScorerError>;

/// A batch sentiment classifier
pub trait SentimentScorer: Send + Sync {
    /// Backend name (for logging)
    fn name(&self) -> &'static str;

    /// Score every text. The output lines up one-to-one with `texts`.
    fn evaluate(
        &self,
        texts: &[String],
        progress: Option<&ProgressCallback>,
    ) -> ScorerResult<Vec<f32>>;
}

/// Check that a backend honoured the positional contract.
pub fn validate_scores(expected: usize, scores: &[f32]) -> ScorerResult<()> {
    if scores.len() != expected {
        return Err(ScorerError::LengthMismatch {
            expected,
            actual: scores.len(),
        });
    }
    if let Some((position, &score)) = scores
        .iter()
        .enumerate()
        .find(|(_, s)| !(0.0..=1.0).contains(*s))
    {
        return Err(ScorerError::OutOfRange { position, score });
    }
    Ok(())
}

/// Supported scorer backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerBackend {
    #[default]
    Lexicon,
    Http,
}

impl FromStr for ScorerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicon" | "local" => Ok(ScorerBackend::Lexicon),
            "http" | "remote" => Ok(ScorerBackend::Http),
            _ => Err(anyhow::anyhow!(
                "Unknown scorer '{}'. Valid scorers: lexicon, http",
                s
            )),
        }
    }
}

impl std::fmt::Display for ScorerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerBackend::Lexicon => write!(f, "lexicon"),
            ScorerBackend::Http => write!(f, "http"),
        }
    }
}

/// Service URL used by the `http` backend when none is configured
pub const DEFAULT_SCORER_URL: &str = "http://localhost:8000/sentiment";

/// Build the configured scorer backend
pub fn build_scorer(
    backend: ScorerBackend,
    url: Option<&str>,
    timeout: Duration,
) -> ScorerResult<Box<dyn SentimentScorer>> {
    match backend {
        ScorerBackend::Lexicon => Ok(Box::new(LexiconScorer::new())),
        ScorerBackend::Http => {
            let url = url.unwrap_or(DEFAULT_SCORER_URL);
            Ok(Box::new(HttpScorer::with_timeout(url, timeout)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_scores_length() {
        let err = validate_scores(3, &[0.1, 0.2]).unwrap_err();
        assert!(matches!(
            err,
            ScorerError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_validate_scores_range() {
        assert!(validate_scores(2, &[0.0, 1.0]).is_ok());
        let err = validate_scores(2, &[0.3, 1.5]).unwrap_err();
        assert!(matches!(err, ScorerError::OutOfRange { position: 1, .. }));
        assert!(validate_scores(1, &[f32::NAN]).is_err());
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!(ScorerBackend::from_str("HTTP").unwrap(), ScorerBackend::Http);
        assert_eq!(
            ScorerBackend::from_str("lexicon").unwrap(),
            ScorerBackend::Lexicon
        );
        assert!(ScorerBackend::from_str("tensorflow").is_err());
        assert_eq!(ScorerBackend::Http.to_string(), "http");
    }

    #[test]
    fn test_build_scorer() {
        let timeout = Duration::from_secs(1);
        let lexicon = build_scorer(ScorerBackend::Lexicon, None, timeout).unwrap();
        assert_eq!(lexicon.name(), "lexicon");

        let http = build_scorer(ScorerBackend::Http, None, timeout).unwrap();
        assert_eq!(http.name(), "http");

        assert!(build_scorer(ScorerBackend::Http, Some("ftp://x"), timeout).is_err());
    }
}
