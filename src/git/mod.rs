//! Git history module
//!
//! Provides the commit walk that feeds the analysis pipeline: commits in
//! topological order (oldest first), their day buckets, and the structural
//! changes each commit made to parseable source files.
//!
//! # Example
//!
//! ```no_run
//! use commit_sentiment::git::{GitHistory, HistoryOptions};
//! use std::path::Path;
//!
//! let history = GitHistory::open(Path::new("/path/to/repo"), HistoryOptions::default()).unwrap();
//! for commit in history.commits().unwrap() {
//!     let changes = history.changes(&commit).unwrap();
//!     println!("{} day {}: {} files", commit.hash, commit.day, changes.len());
//! }
//! ```

pub mod history;

pub use history::{commits_by_day, CommitInfo, GitHistory, HistoryOptions, DEFAULT_MAX_FILE_SIZE};
