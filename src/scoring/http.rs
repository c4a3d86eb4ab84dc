//! Remote sentiment service client
//!
//! Posts the whole batch as `{"texts": [...]}` and expects `{"scores": [...]}`
//! back. Uses ureq (sync HTTP), the call blocks until the service answers.

use super::{validate_scores, ProgressCallback, ScorerError, ScorerResult, SentimentScorer};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default request timeout, model inference over a long history is slow
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub struct HttpScorer {
    url: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are mapped to ScorerError below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl HttpScorer {
    pub fn new(url: impl Into<String>) -> ScorerResult<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> ScorerResult<Self> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ScorerError::ConfigError(format!(
                "scorer url must start with http:// or https://, got '{}'",
                url
            )));
        }
        Ok(Self {
            url,
            agent: make_agent(timeout),
        })
    }
}

#[derive(Serialize)]
struct ScoreRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct ScoreResponse {
    scores: Vec<f32>,
}

impl SentimentScorer for HttpScorer {
    fn name(&self) -> &'static str {
        "http"
    }

    fn evaluate(
        &self,
        texts: &[String],
        progress: Option<&ProgressCallback>,
    ) -> ScorerResult<Vec<f32>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(cb) = progress {
            cb(0, texts.len());
        }

        debug!("Posting {} texts to {}", texts.len(), self.url);
        let response = self
            .agent
            .post(self.url.as_str())
            .header("Content-Type", "application/json")
            .send_json(&ScoreRequest { texts })
            .map_err(|e| ScorerError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(ScorerError::ServiceError { status, message });
        }

        let resp: ScoreResponse = response
            .into_body()
            .read_json()
            .map_err(|e| ScorerError::ParseError(e.to_string()))?;

        validate_scores(texts.len(), &resp.scores)?;
        if let Some(cb) = progress {
            cb(texts.len(), texts.len());
        }
        Ok(resp.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            HttpScorer::new("localhost:8000"),
            Err(ScorerError::ConfigError(_))
        ));
        assert!(HttpScorer::new("http://localhost:8000/sentiment").is_ok());
    }

    #[test]
    fn test_empty_batch_skips_the_request() {
        // nothing listens on port 9, an actual request would fail
        let scorer = HttpScorer::new("http://127.0.0.1:9/sentiment").expect("valid url");
        assert_eq!(scorer.evaluate(&[], None).expect("empty batch"), Vec::<f32>::new());
    }

    #[test]
    fn test_unreachable_service_is_an_error() {
        let scorer = HttpScorer::with_timeout("http://127.0.0.1:9/sentiment", Duration::from_secs(2))
            .expect("valid url");
        let err = scorer.evaluate(&["some text".to_string()], None).unwrap_err();
        assert!(matches!(err, ScorerError::RequestFailed(_)));
    }
}
