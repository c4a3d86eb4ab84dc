//! Offline word-list sentiment scorer
//!
//! Sums word polarities, flipping the sign of a word when a negator appears
//! in the three preceding tokens, and squashes the sum with a logistic
//! function. Text without any polar word scores exactly 0.5.

use super::{ProgressCallback, ScorerResult, SentimentScorer};

const POSITIVE: &[&str] = &[
    "awesome", "beautiful", "better", "best", "clean", "cleaner", "correct", "easy",
    "efficient", "elegant", "excellent", "fast", "faster", "fine", "fix", "fixed", "good",
    "great", "happy", "improve", "improved", "love", "neat", "nice", "perfect", "robust",
    "safe", "simple", "simpler", "stable", "thanks", "useful", "welcome", "well", "wonderful",
    "works",
];

const NEGATIVE: &[&str] = &[
    "annoying", "awful", "bad", "broken", "bug", "buggy", "confusing", "crap", "crash",
    "damn", "dirty", "fail", "fails", "failure", "hack", "hacky", "hate", "horrible", "ugly",
    "insane", "mess", "messy", "problem", "shit", "slow", "stupid", "terrible", "ugh",
    "unfortunately", "weird", "workaround", "worse", "worst", "wrong", "wtf",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "isn't", "wasn't", "aren't", "won't", "can't", "cannot", "don't",
    "doesn't", "without",
];

#[derive(Debug, Clone, Copy)]
pub struct LexiconScorer {
    /// Logistic steepness; larger values push scores away from 0.5 faster
    steepness: f32,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self { steepness: 1.0 }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }

    fn word_polarity(word: &str) -> i32 {
        if POSITIVE.contains(&word) {
            1
        } else if NEGATIVE.contains(&word) {
            -1
        } else {
            0
        }
    }

    /// Summed polarity of a text
    pub fn polarity(text: &str) -> i32 {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut total = 0;
        for (i, token) in tokens.iter().enumerate() {
            let base = Self::word_polarity(token);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && NEGATORS.contains(&tokens[i - k].as_str()));
            total += if negated { -base } else { base };
        }
        total
    }

    /// Score one text in [0, 1]
    pub fn score(&self, text: &str) -> f32 {
        let raw = Self::polarity(text) as f32;
        1.0 / (1.0 + (-self.steepness * raw).exp())
    }
}

/// Lower-case word tokens, apostrophes kept so contractions stay negators
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn evaluate(
        &self,
        texts: &[String],
        progress: Option<&ProgressCallback>,
    ) -> ScorerResult<Vec<f32>> {
        let total = texts.len();
        let mut scores = Vec::with_capacity(total);
        for (i, text) in texts.iter().enumerate() {
            scores.push(self.score(text));
            if let Some(cb) = progress {
                if (i + 1) % 256 == 0 || i + 1 == total {
                    cb(i + 1, total);
                }
            }
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_neutral_text_scores_half() {
        assert_eq!(LexiconScorer::new().score("the cache holds parsed trees"), 0.5);
    }

    #[test]
    fn test_polarity_direction() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("this is a great and elegant solution") > 0.75);
        assert!(scorer.score("horrible hack, this is broken") < 0.25);
    }

    #[test]
    fn test_negation_flips_polarity() {
        assert_eq!(LexiconScorer::polarity("this is good"), 1);
        assert_eq!(LexiconScorer::polarity("this is not good"), -1);
        assert_eq!(LexiconScorer::polarity("this doesn't look bad at all"), 1);
    }

    #[test]
    fn test_evaluate_keeps_positions_and_reports_progress() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_cb = Arc::clone(&seen);
        let cb: ProgressCallback = Box::new(move |done, _total| {
            seen_cb.store(done, Ordering::SeqCst);
        });

        let texts = vec![
            "terrible".to_string(),
            "neutral words".to_string(),
            "great".to_string(),
        ];
        let scores = LexiconScorer::new().evaluate(&texts, Some(&cb)).expect("scores");
        assert_eq!(scores.len(), 3);
        assert!(scores[0] < 0.5);
        assert_eq!(scores[1], 0.5);
        assert!(scores[2] > 0.5);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
