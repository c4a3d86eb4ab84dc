//! CLI command definitions and handlers

pub(crate) mod analyze;
mod analyses;
mod decode;

use crate::reporters::OutputFormat;
use crate::scoring::ScorerBackend;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate the sentiment gap, which must lie in [0, 1)
fn parse_gap(s: &str) -> Result<f32, String> {
    let gap: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..1.0).contains(&gap) {
        Err("sentiment gap must be >= 0 and < 1".to_string())
    } else {
        Ok(gap)
    }
}

/// commit-sentiment - Comment sentiment through a repository's history
#[derive(Parser, Debug)]
#[command(name = "commit-sentiment")]
#[command(
    version,
    about = "Track how the tone of code comments changes over a repository's history",
    long_about = "commit-sentiment walks the git history of a repository, extracts the \
comments each commit introduces, scores them with a sentiment classifier and reports \
the average sentiment of every day that has confidently positive or negative comments.\n\n\
Supported languages: Python, TypeScript, JavaScript, Rust, Go, Java, C#, C, C++",
    after_help = "\
Examples:
  commit-sentiment analyze .                             Analyze current repository
  commit-sentiment analyze . --format json               JSON output for scripting
  commit-sentiment analyze . -f binary -o sentiment.bin  Binary result for later decoding
  commit-sentiment decode sentiment.bin                  Render a binary result as text
  commit-sentiment analyses                              List analyses and their options"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure comment sentiment over the history of a repository
    #[command(after_help = "\
Examples:
  commit-sentiment analyze .                                     Lexicon scorer, text output
  commit-sentiment analyze . --scorer-url http://localhost:8000/sentiment   Remote classifier
  commit-sentiment analyze . --sentiment-gap 0.2                 Count weaker sentiment too
  commit-sentiment analyze . --max-commits 500 --all-parents     Recent history, all merges")]
    Analyze {
        /// Path to repository (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: text, binary, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "binary", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Minimum length of the comment to be analyzed
        #[arg(long)]
        min_comment_len: Option<usize>,

        /// Sentiment value threshold, values between 0.5 - X/2 and 0.5 + X/2 will not be considered
        #[arg(long, value_parser = parse_gap)]
        sentiment_gap: Option<f32>,

        /// Scorer backend: lexicon (offline) or http (remote service)
        #[arg(long, value_parser = ["lexicon", "http"])]
        scorer: Option<String>,

        /// Sentiment service URL (selects the http scorer unless --scorer is given)
        #[arg(long)]
        scorer_url: Option<String>,

        /// Analyze only the most recent N commits (0 = all)
        #[arg(long)]
        max_commits: Option<usize>,

        /// Follow every parent of merge commits, not only the first
        #[arg(long)]
        all_parents: bool,

        /// Hide progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Render a binary sentiment result
    Decode {
        /// Binary result file, `-` for stdin
        file: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the available analyses with their configuration options
    Analyses,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            min_comment_len,
            sentiment_gap,
            scorer,
            scorer_url,
            max_commits,
            all_parents,
            no_progress,
        } => {
            let scorer = scorer
                .map(|s| s.parse::<ScorerBackend>())
                .transpose()?;
            analyze::run(analyze::AnalyzeArgs {
                path,
                format: format.parse::<OutputFormat>()?,
                output,
                min_comment_len,
                sentiment_gap,
                scorer,
                scorer_url,
                max_commits,
                all_parents,
                no_progress,
            })
        }

        Commands::Decode { file, format } => decode::run(&file, format.parse()?),

        Commands::Analyses => analyses::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gap() {
        assert_eq!(parse_gap("0.25"), Ok(0.25));
        assert_eq!(parse_gap("0"), Ok(0.0));
        assert!(parse_gap("1").is_err());
        assert!(parse_gap("-0.1").is_err());
        assert!(parse_gap("half").is_err());
    }

    #[test]
    fn test_cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "commit-sentiment",
            "analyze",
            "/tmp/repo",
            "--format",
            "json",
            "--min-comment-len",
            "30",
            "--sentiment-gap",
            "0.4",
            "--all-parents",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                path,
                format,
                min_comment_len,
                sentiment_gap,
                all_parents,
                ..
            } => {
                assert_eq!(path, PathBuf::from("/tmp/repo"));
                assert_eq!(format, "json");
                assert_eq!(min_comment_len, Some(30));
                assert_eq!(sentiment_gap, Some(0.4));
                assert!(all_parents);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["commit-sentiment", "analyze", "--format", "sarif"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
