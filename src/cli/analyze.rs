//! Analyze command
//!
//! Resolves configuration, walks the history with progress bars, runs the
//! sentiment analysis and writes the result.

use crate::config::Config;
use crate::driver::run_analysis_with_progress;
use crate::git::{CommitInfo, GitHistory};
use crate::pipeline::{AnalysisResult, LeafPipelineItem};
use crate::reporters::OutputFormat;
use crate::scoring::{build_scorer, ScorerBackend};
use crate::sentiment::CommentSentimentAnalysis;
use anyhow::{Context, Result};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Arguments of the analyze command after CLI parsing
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub min_comment_len: Option<usize>,
    pub sentiment_gap: Option<f32>,
    pub scorer: Option<ScorerBackend>,
    pub scorer_url: Option<String>,
    pub max_commits: Option<usize>,
    pub all_parents: bool,
    pub no_progress: bool,
}

/// Apply command line flags on top of the file and environment layers
pub(crate) fn apply_overrides(config: &mut Config, args: &AnalyzeArgs) {
    if let Some(v) = args.min_comment_len {
        config.sentiment.min_comment_length = v;
    }
    if let Some(v) = args.sentiment_gap {
        config.sentiment.gap = v;
    }
    if let Some(url) = &args.scorer_url {
        config.scorer.url = Some(url.clone());
        if args.scorer.is_none() {
            config.scorer.backend = ScorerBackend::Http;
        }
    }
    if let Some(backend) = args.scorer {
        config.scorer.backend = backend;
    }
    if let Some(v) = args.max_commits {
        config.history.max_commits = v;
    }
    if args.all_parents {
        config.history.first_parent = false;
    }
}

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .expect("valid template")
}

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid template")
        .progress_chars("█▓▒░  ")
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    let repo_root = GitHistory::discover_root(&args.path)?;
    let mut config = Config::load(&repo_root);
    apply_overrides(&mut config, &args);
    info!("Resolved configuration: {:?}", config);

    let history = GitHistory::open(&repo_root, config.history.clone())?;

    let multi = if args.no_progress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };
    print_header(&multi, &repo_root, &config);

    let scorer = build_scorer(
        config.scorer.backend,
        config.scorer.url.as_deref(),
        config.scorer.timeout(),
    )?;
    let mut analysis = CommentSentimentAnalysis::new().with_scorer(scorer);

    let scoring_bar = ProgressBar::new_spinner();
    scoring_bar.set_style(create_spinner_style());
    {
        let bar = scoring_bar.clone();
        let bar_style = create_bar_style();
        analysis.set_progress(Box::new(move |done, total| {
            if bar.length() != Some(total as u64) {
                bar.set_style(bar_style.clone());
                bar.set_length(total as u64);
                bar.set_message(format!("Scoring {}", comment_count(total)));
            }
            bar.set_position(done as u64);
        }));
    }

    let commit_bar = multi.add(ProgressBar::new(0));
    commit_bar.set_style(create_bar_style());
    commit_bar.set_message("Walking history");
    commit_bar.enable_steady_tick(Duration::from_millis(100));

    let on_commit = |commit: &CommitInfo, done: usize, total: usize| {
        commit_bar.set_length(total as u64);
        commit_bar.set_position(done as u64);
        commit_bar.set_message(format!(
            "day {} {}",
            commit.day,
            &commit.hash[..commit.hash.len().min(8)]
        ));
        if done == total {
            commit_bar.finish_with_message("History walked");
            multi.add(scoring_bar.clone());
            scoring_bar.enable_steady_tick(Duration::from_millis(100));
        }
    };

    let result = run_analysis_with_progress(
        &history,
        &mut analysis,
        config.facts(),
        Some(&on_commit),
    );
    commit_bar.finish_and_clear();
    scoring_bar.finish_and_clear();
    let result = result?;

    write_output(&analysis, &result, args.format, args.output.as_deref())?;
    print_summary(&multi, &result, start_time.elapsed());
    Ok(())
}

fn comment_count(total: usize) -> String {
    if total == 1 {
        "1 comment".to_string()
    } else {
        format!("{} comments", total)
    }
}

/// Print analysis header to stderr, keeping stdout for the result
fn print_header(multi: &MultiProgress, repo_path: &Path, config: &Config) {
    if multi.is_hidden() {
        return;
    }
    eprintln!("\n{}", style("Comment sentiment analysis").bold());
    eprintln!("Repository: {}", style(repo_path.display()).cyan());
    eprintln!(
        "Scorer:     {}  gap {}  min length {}\n",
        style(config.scorer.backend).cyan(),
        config.sentiment.gap,
        config.sentiment.min_comment_length
    );
}

fn write_output(
    analysis: &CommentSentimentAnalysis,
    result: &AnalysisResult,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            analysis.serialize(result, format, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", style(path.display()).cyan());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            analysis.serialize(result, format, &mut writer)?;
            writer.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn print_summary(multi: &MultiProgress, result: &AnalysisResult, elapsed: Duration) {
    if multi.is_hidden() {
        return;
    }
    let AnalysisResult::Sentiment(sentiment) = result;
    let overall = sentiment
        .overall_score()
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| "n/a".to_string());
    eprintln!(
        "\n{} {} days, {} comments, overall sentiment {} in {:.2}s",
        style("Done:").bold().green(),
        style(sentiment.len()).cyan(),
        style(sentiment.total_comments()).cyan(),
        style(overall).cyan(),
        elapsed.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_layers() {
        let mut config = Config::default();
        config.sentiment.gap = 0.1;
        let args = AnalyzeArgs {
            sentiment_gap: Some(0.3),
            min_comment_len: Some(42),
            max_commits: Some(7),
            all_parents: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.sentiment.gap, 0.3);
        assert_eq!(config.sentiment.min_comment_length, 42);
        assert_eq!(config.history.max_commits, 7);
        assert!(!config.history.first_parent);
    }

    #[test]
    fn test_scorer_url_selects_http_unless_scorer_given() {
        let mut config = Config::default();
        let args = AnalyzeArgs {
            scorer_url: Some("http://localhost:1/".into()),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.scorer.backend, ScorerBackend::Http);

        let mut config = Config::default();
        let args = AnalyzeArgs {
            scorer_url: Some("http://localhost:1/".into()),
            scorer: Some(ScorerBackend::Lexicon),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.scorer.backend, ScorerBackend::Lexicon);
        assert_eq!(config.scorer.url.as_deref(), Some("http://localhost:1/"));
    }
}
