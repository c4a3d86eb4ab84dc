//! commit-sentiment - Comment sentiment through a repository's history
//!
//! Walks the git history of a repository, collects the comments every commit
//! introduces, scores them in one batch and reports the mean sentiment of
//! every day that has confidently positive or negative comments.
//!
//! ```no_run
//! use commit_sentiment::config::Config;
//! use commit_sentiment::driver::run_analysis;
//! use commit_sentiment::git::GitHistory;
//! use commit_sentiment::reporters::{report, OutputFormat};
//! use commit_sentiment::sentiment::CommentSentimentAnalysis;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let history = GitHistory::open(Path::new("."), config.history.clone()).unwrap();
//! let mut analysis = CommentSentimentAnalysis::new();
//! let result = run_analysis(&history, &mut analysis, config.facts()).unwrap();
//! if let Some(sentiment) = result.as_sentiment() {
//!     print!("{}", report(sentiment, OutputFormat::Text).unwrap());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod git;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod sentiment;
pub mod uast;
