//! Core data models for commit-sentiment
//!
//! These models carry the final per-day sentiment produced once the whole
//! commit history has been consumed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Day bucket: whole days since the first analysed commit.
pub type Day = i32;

/// Mapping from day bucket to the commit hashes of that day.
pub type CommitsByDay = BTreeMap<Day, Vec<String>>;

/// Aggregated sentiment of a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DaySentiment {
    /// Mean of the retained comment scores, in [0, 1] (0 = negative, 1 = positive)
    pub score: f32,
    /// Comments that survived the neutral deadzone, in consumption order
    pub comments: Vec<String>,
    /// Commit hashes belonging to the day
    #[serde(default)]
    pub commits: Vec<String>,
}

/// Final result of the comment sentiment analysis.
///
/// Every day present has at least one retained comment. Days whose comments
/// were all neutral are absent rather than zero-valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SentimentResult {
    pub days: BTreeMap<Day, DaySentiment>,
}

impl SentimentResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no day survived the reduction
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of days with a sentiment value
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn get(&self, day: Day) -> Option<&DaySentiment> {
        self.days.get(&day)
    }

    /// Total retained comments across all days
    pub fn total_comments(&self) -> usize {
        self.days.values().map(|d| d.comments.len()).sum()
    }

    /// Comment-weighted mean over the whole history, if anything was retained
    pub fn overall_score(&self) -> Option<f32> {
        let total = self.total_comments();
        if total == 0 {
            return None;
        }
        let sum: f32 = self
            .days
            .values()
            .map(|d| d.score * d.comments.len() as f32)
            .sum();
        Some(sum / total as f32)
    }
}
