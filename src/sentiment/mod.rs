//! Comment sentiment through time
//!
//! Per commit, comments introduced by the change are extracted, merged into
//! contiguous blocks, cleaned and filed under the commit's day. Nothing is
//! scored until `finalize`: the whole history goes to the scorer in a single
//! batch, then each day is reduced to the mean of its non-neutral scores.

pub mod extract;
pub mod filter;
pub mod merge;
pub mod reduce;

use crate::models::{CommitsByDay, Day, SentimentResult};
use crate::pipeline::{
    AnalysisResult, CommitDeps, ConfigurationOption, ConfigurationOptionType, Facts,
    LeafPipelineItem, PipelineItem, DEPENDENCY_DAY, DEPENDENCY_UAST_CHANGES, FEATURE_UAST,
};
use crate::reporters::{self, OutputFormat};
use crate::scoring::{validate_scores, LexiconScorer, ProgressCallback, SentimentScorer};
use crate::uast::Node;
use anyhow::{Context, Result};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info, warn};

pub const CONFIG_MIN_LENGTH: &str = "CommentSentiment.MinLength";
pub const CONFIG_GAP: &str = "CommentSentiment.Gap";

pub const DEFAULT_MIN_COMMENT_LENGTH: usize = 20;
pub const DEFAULT_GAP: f32 = 0.5;

/// Thresholds below this make the letter-ratio and license checks meaningless
pub const MIN_COMMENT_LENGTH_FLOOR: usize = 10;

/// Clamp an out-of-range gap to the default
pub fn validate_gap(gap: f32) -> f32 {
    if !(0.0..1.0).contains(&gap) {
        warn!(
            "Sentiment gap is out of range [0, 1): {} => reset to the default {}",
            gap, DEFAULT_GAP
        );
        return DEFAULT_GAP;
    }
    gap
}

/// Clamp a too small minimum comment length to the default
pub fn validate_min_length(min_length: usize) -> usize {
    if min_length < MIN_COMMENT_LENGTH_FLOOR {
        warn!(
            "Comment minimum length is too small: {} => reset to the default {}",
            min_length, DEFAULT_MIN_COMMENT_LENGTH
        );
        return DEFAULT_MIN_COMMENT_LENGTH;
    }
    min_length
}

/// Measures comment sentiment through time
pub struct CommentSentimentAnalysis {
    min_comment_length: usize,
    gap: f32,
    scorer: Box<dyn SentimentScorer>,
    progress: Option<ProgressCallback>,

    comments_by_day: BTreeMap<Day, Vec<String>>,
    commits_by_day: CommitsByDay,
}

impl CommentSentimentAnalysis {
    pub fn new() -> Self {
        Self {
            min_comment_length: DEFAULT_MIN_COMMENT_LENGTH,
            gap: DEFAULT_GAP,
            scorer: Box::new(LexiconScorer::new()),
            progress: None,
            comments_by_day: BTreeMap::new(),
            commits_by_day: CommitsByDay::new(),
        }
    }

    /// Replace the batch scorer
    pub fn with_scorer(mut self, scorer: Box<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Report scoring progress as `(done, total)`
    pub fn set_progress(&mut self, progress: ProgressCallback) {
        self.progress = Some(progress);
    }

    pub fn min_comment_length(&self) -> usize {
        self.min_comment_length
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Comments accumulated so far, by day
    pub fn comments_by_day(&self) -> &BTreeMap<Day, Vec<String>> {
        &self.comments_by_day
    }

    fn validate(&mut self) {
        self.gap = validate_gap(self.gap);
        self.min_comment_length = validate_min_length(self.min_comment_length);
    }

    /// Accumulate the comments a commit introduced under its day
    pub fn add_commit(&mut self, day: Day, changes: &[crate::uast::UastChange]) {
        let groups = extract::extract_changes(changes, Node::is_comment);
        // lines are only adjacent within one file
        let merged: Vec<String> = groups
            .iter()
            .flat_map(|nodes| merge::merge_comments(nodes))
            .collect();
        let comments = filter::filter_comments(&merged, self.min_comment_length);
        debug!(
            "day {}: {} comment nodes in {} files, {} merged, {} kept",
            day,
            groups.iter().map(Vec::len).sum::<usize>(),
            groups.len(),
            merged.len(),
            comments.len()
        );
        self.comments_by_day.entry(day).or_default().extend(comments);
    }

    /// Score every accumulated comment in one batch and reduce per day.
    ///
    /// Takes the accumulated state; a scorer failure yields no result.
    pub fn compute(&mut self) -> Result<SentimentResult> {
        let batch = reduce::flatten(std::mem::take(&mut self.comments_by_day));
        info!(
            "Scoring {} comments over {} days with the {} scorer",
            batch.len(),
            batch.bounds.len(),
            self.scorer.name()
        );

        let scores = self
            .scorer
            .evaluate(&batch.texts, self.progress.as_ref())
            .context("Sentiment scoring failed")?;
        validate_scores(batch.len(), &scores).context("Sentiment scoring failed")?;

        Ok(reduce::reduce(batch, &scores, self.gap, &self.commits_by_day))
    }
}

impl Default for CommentSentimentAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineItem for CommentSentimentAnalysis {
    fn name(&self) -> &'static str {
        "Sentiment"
    }

    fn provides(&self) -> Vec<&'static str> {
        vec![]
    }

    fn requires(&self) -> Vec<&'static str> {
        vec![DEPENDENCY_UAST_CHANGES, DEPENDENCY_DAY]
    }

    fn features(&self) -> Vec<&'static str> {
        vec![FEATURE_UAST]
    }

    fn configuration_options(&self) -> Vec<ConfigurationOption> {
        vec![
            ConfigurationOption {
                name: CONFIG_MIN_LENGTH,
                description: "Minimum length of the comment to be analyzed.",
                flag: "min-comment-len",
                option_type: ConfigurationOptionType::Int,
                default: json!(DEFAULT_MIN_COMMENT_LENGTH),
            },
            ConfigurationOption {
                name: CONFIG_GAP,
                description: "Sentiment value threshold, values between 0.5 - X/2 and 0.5 + X/2 \
                              will not be considered. Must be >= 0 and < 1. The purpose is to \
                              exclude neutral comments.",
                flag: "sentiment-gap",
                option_type: ConfigurationOptionType::Float,
                default: json!(DEFAULT_GAP),
            },
        ]
    }

    fn configure(&mut self, facts: &Facts) -> Result<()> {
        if let Some(gap) = facts.get_option::<f32>(CONFIG_GAP) {
            self.gap = gap;
        }
        if let Some(min_length) = facts.get_option::<i64>(CONFIG_MIN_LENGTH) {
            // negative lengths are as useless as tiny ones
            self.min_comment_length = usize::try_from(min_length).unwrap_or(0);
        }
        self.validate();
        self.commits_by_day = facts.commits_by_day.clone();
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        self.comments_by_day.clear();
        self.validate();
        Ok(())
    }

    fn consume(&mut self, deps: &CommitDeps<'_>) -> Result<()> {
        self.add_commit(deps.day, deps.changes);
        Ok(())
    }
}

impl LeafPipelineItem for CommentSentimentAnalysis {
    fn flag(&self) -> &'static str {
        "sentiment"
    }

    fn finalize(&mut self) -> Result<AnalysisResult> {
        Ok(AnalysisResult::Sentiment(self.compute()?))
    }

    fn serialize(
        &self,
        result: &AnalysisResult,
        format: OutputFormat,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let AnalysisResult::Sentiment(sentiment) = result;
        reporters::write_result(sentiment, format, writer)
    }
}
