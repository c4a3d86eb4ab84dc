//! Runs a leaf analysis over a repository history

use crate::git::{commits_by_day, CommitInfo, GitHistory};
use crate::pipeline::{
    AnalysisResult, CommitDeps, Facts, LeafPipelineItem, DEPENDENCY_DAY, DEPENDENCY_UAST_CHANGES,
    FEATURE_UAST,
};
use anyhow::{bail, Context, Result};
use tracing::{debug, info};

/// Entities the history walk hands to every item
pub const PROVIDED: &[&str] = &[DEPENDENCY_UAST_CHANGES, DEPENDENCY_DAY];

/// Features the driver enables
pub const FEATURES: &[&str] = &[FEATURE_UAST];

/// Per-commit progress, called with `(commit, done, total)` after each commit
pub type CommitProgress<'a> = &'a dyn Fn(&CommitInfo, usize, usize);

/// Check that the driver can feed an item
pub fn check_requirements(item: &dyn LeafPipelineItem) -> Result<()> {
    for dep in item.requires() {
        if !PROVIDED.contains(&dep) {
            bail!("{} requires '{}', which nothing provides", item.name(), dep);
        }
    }
    for feature in item.features() {
        if !FEATURES.contains(&feature) {
            bail!("{} needs the disabled feature '{}'", item.name(), feature);
        }
    }
    Ok(())
}

/// Stream every commit of the history into `item` and finalize it.
pub fn run_analysis(
    history: &GitHistory,
    item: &mut dyn LeafPipelineItem,
    facts: Facts,
) -> Result<AnalysisResult> {
    run_analysis_with_progress(history, item, facts, None)
}

pub fn run_analysis_with_progress(
    history: &GitHistory,
    item: &mut dyn LeafPipelineItem,
    facts: Facts,
    progress: Option<CommitProgress<'_>>,
) -> Result<AnalysisResult> {
    check_requirements(&*item)?;

    let commits = history.commits()?;
    info!("Analyzing {} commits with {}", commits.len(), item.name());

    let facts = facts.with_commits_by_day(commits_by_day(&commits));
    item.configure(&facts)
        .with_context(|| format!("Failed to configure {}", item.name()))?;
    item.initialize()
        .with_context(|| format!("Failed to initialize {}", item.name()))?;

    let total = commits.len();
    for (i, commit) in commits.iter().enumerate() {
        let changes = history
            .changes(commit)
            .with_context(|| format!("Failed to read changes of {}", commit.hash))?;
        debug!(
            "{} day {}: {} changed files",
            &commit.hash[..commit.hash.len().min(12)],
            commit.day,
            changes.len()
        );

        item.consume(&CommitDeps {
            hash: &commit.hash,
            day: commit.day,
            changes: &changes,
        })
        .with_context(|| format!("{} failed on commit {}", item.name(), commit.hash))?;

        if let Some(progress) = progress {
            progress(commit, i + 1, total);
        }
    }

    item.finalize()
        .with_context(|| format!("Failed to finalize {}", item.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ConfigurationOption, PipelineItem};
    use crate::reporters::OutputFormat;
    use crate::sentiment::CommentSentimentAnalysis;
    use std::io::Write;

    struct NeedsBlame;

    impl PipelineItem for NeedsBlame {
        fn name(&self) -> &'static str {
            "Blame"
        }
        fn provides(&self) -> Vec<&'static str> {
            vec![]
        }
        fn requires(&self) -> Vec<&'static str> {
            vec!["blame"]
        }
        fn configuration_options(&self) -> Vec<ConfigurationOption> {
            vec![]
        }
        fn configure(&mut self, _: &Facts) -> Result<()> {
            Ok(())
        }
        fn initialize(&mut self) -> Result<()> {
            Ok(())
        }
        fn consume(&mut self, _: &CommitDeps<'_>) -> Result<()> {
            Ok(())
        }
    }

    impl LeafPipelineItem for NeedsBlame {
        fn flag(&self) -> &'static str {
            "blame"
        }
        fn finalize(&mut self) -> Result<AnalysisResult> {
            bail!("unreachable")
        }
        fn serialize(&self, _: &AnalysisResult, _: OutputFormat, _: &mut dyn Write) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sentiment_requirements_are_met() {
        assert!(check_requirements(&CommentSentimentAnalysis::new()).is_ok());
    }

    #[test]
    fn test_unmet_requirement_is_rejected() {
        let err = check_requirements(&NeedsBlame).unwrap_err();
        assert!(err.to_string().contains("blame"));
    }
}
