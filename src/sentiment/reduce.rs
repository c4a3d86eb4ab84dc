//! Batch flattening and per-day reduction
//!
//! The scorer is invoked once over every comment of the history. `flatten`
//! fixes the order of that batch; `reduce` walks the same order to map the
//! scores back to their days.

use crate::models::{CommitsByDay, Day, DaySentiment, SentimentResult};
use std::collections::BTreeMap;

/// Comments of all days in one ordered batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatBatch {
    /// Every comment, days ascending, per-day order preserved
    pub texts: Vec<String>,
    /// `(day, count)` boundaries in the same order as `texts`
    pub bounds: Vec<(Day, usize)>,
}

impl FlatBatch {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Flatten the day-keyed comments into one batch.
pub fn flatten(comments_by_day: BTreeMap<Day, Vec<String>>) -> FlatBatch {
    let mut batch = FlatBatch::default();
    for (day, comments) in comments_by_day {
        batch.bounds.push((day, comments.len()));
        batch.texts.extend(comments);
    }
    batch
}

/// Whether a score is confident enough to count.
///
/// Scores strictly inside `(0.5·(1−gap), 0.5·(1+gap))` are neutral; the
/// boundaries themselves are kept.
pub fn outside_deadzone(score: f32, gap: f32) -> bool {
    score <= 0.5 * (1.0 - gap) || score >= 0.5 * (1.0 + gap)
}

/// Map positional scores back to days and average the confident ones.
///
/// `scores` must line up one-to-one with `batch.texts`; callers check the
/// lengths before reducing.
pub fn reduce(
    batch: FlatBatch,
    scores: &[f32],
    gap: f32,
    commits_by_day: &CommitsByDay,
) -> SentimentResult {
    debug_assert_eq!(batch.texts.len(), scores.len());

    let mut result = SentimentResult::new();
    let mut texts = batch.texts.into_iter();
    let mut pos = 0;

    for (day, count) in batch.bounds {
        let mut sum = 0.0f32;
        let mut kept = Vec::with_capacity(count);
        for comment in texts.by_ref().take(count) {
            let score = scores[pos];
            pos += 1;
            if outside_deadzone(score, gap) {
                sum += score;
                kept.push(comment);
            }
        }
        if kept.is_empty() {
            continue;
        }
        result.days.insert(
            day,
            DaySentiment {
                score: sum / kept.len() as f32,
                comments: kept,
                commits: commits_by_day.get(&day).cloned().unwrap_or_default(),
            },
        );
    }

    result
}
