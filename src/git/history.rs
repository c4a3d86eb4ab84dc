//! Git history traversal using libgit2
//!
//! Walks commits oldest first, buckets them into days and turns each commit's
//! diff into structural changes of the touched source files.

use crate::models::{CommitsByDay, Day};
use crate::parsers::{self, Language};
use crate::uast::UastChange;
use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use git2::{Delta, DiffFile, Oid, Repository, Sort};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default limit on the size of a parsed blob (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// How the history is walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Keep only the most recent N commits, 0 for all
    pub max_commits: usize,
    /// Follow only the first parent of merges
    pub first_parent: bool,
    /// Blobs larger than this are not parsed
    pub max_file_size: u64,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_commits: 0,
            first_parent: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// A commit of the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash
    pub hash: String,
    /// Whole days since the first commit of the walk
    pub day: Day,
    /// Committer time, seconds since the epoch
    pub timestamp: i64,
    pub author: String,
    /// First line of the message
    pub message: String,
}

/// Group commit hashes by day, preserving walk order within a day
pub fn commits_by_day(commits: &[CommitInfo]) -> CommitsByDay {
    let mut map = CommitsByDay::new();
    for commit in commits {
        map.entry(commit.day).or_default().push(commit.hash.clone());
    }
    map
}

/// One side of a changed file, read out of the object database
struct BlobText {
    language: Language,
    text: String,
}

/// A changed file waiting to be parsed
struct PendingChange {
    path: String,
    before: Option<BlobText>,
    after: Option<BlobText>,
}

/// Git history reader using libgit2.
pub struct GitHistory {
    repo: Repository,
    options: HistoryOptions,
}

impl GitHistory {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path, options: HistoryOptions) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo, options })
    }

    /// Working directory root of the repository containing `path`.
    pub fn discover_root(path: &Path) -> Result<PathBuf> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        repo.workdir()
            .map(Path::to_path_buf)
            .context("Repository has no working directory (bare repo?)")
    }

    /// Check if a path is inside a git repository.
    pub fn is_git_repo(path: &Path) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Get the repository root path.
    pub fn repo_root(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")
    }

    /// Walk the history oldest first and assign days.
    ///
    /// Days count whole UTC calendar days since the first kept commit and
    /// never decrease along the walk, even when committer clocks do.
    pub fn commits(&self) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        revwalk
            .push_head()
            .context("Failed to read HEAD (repository without commits?)")?;
        if self.options.first_parent {
            revwalk.simplify_first_parent()?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            commits.push(CommitInfo {
                hash: commit.id().to_string(),
                day: 0,
                timestamp: commit.time().seconds(),
                author: commit.author().name().unwrap_or("Unknown").to_string(),
                message: commit
                    .message()
                    .unwrap_or("")
                    .lines()
                    .next()
                    .unwrap_or("")
                    .to_string(),
            });
        }

        let max = self.options.max_commits;
        if max > 0 && commits.len() > max {
            commits.drain(..commits.len() - max);
        }

        assign_days(&mut commits);
        debug!(
            "Walked {} commits over {} days",
            commits.len(),
            commits.last().map(|c| c.day + 1).unwrap_or(0)
        );
        Ok(commits)
    }

    /// Structural changes of every parseable file touched by a commit.
    ///
    /// The commit is diffed against its first parent (the empty tree for a
    /// root commit). Binary, non-UTF-8 and oversized blobs are skipped.
    pub fn changes(&self, commit: &CommitInfo) -> Result<Vec<UastChange>> {
        let oid = Oid::from_str(&commit.hash)?;
        let commit = self.repo.find_commit(oid)?;
        let tree = commit.tree()?;
        let parent = commit.parent(0).ok();
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

        let mut diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .with_context(|| format!("Failed to diff commit {}", oid))?;
        diff.find_similar(None)?;

        let mut pending = Vec::new();
        for delta in diff.deltas() {
            let (before, after) = match delta.status() {
                Delta::Added | Delta::Copied => (None, Some(delta.new_file())),
                Delta::Deleted => (Some(delta.old_file()), None),
                Delta::Modified | Delta::Renamed | Delta::Typechange => {
                    (Some(delta.old_file()), Some(delta.new_file()))
                }
                _ => continue,
            };

            let before = before.and_then(|f| self.read_blob(&f));
            let after = after.and_then(|f| self.read_blob(&f));
            if before.is_none() && after.is_none() {
                continue;
            }

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            pending.push(PendingChange {
                path,
                before,
                after,
            });
        }

        Ok(pending.into_par_iter().filter_map(parse_change).collect())
    }

    fn read_blob(&self, file: &DiffFile<'_>) -> Option<BlobText> {
        let path = file.path()?;
        let language = Language::from_path(path)?;
        if file.id().is_zero() {
            return None;
        }
        let blob = self.repo.find_blob(file.id()).ok()?;
        if blob.size() as u64 > self.options.max_file_size {
            debug!("Skipping {:?}: {} bytes", path, blob.size());
            return None;
        }
        if blob.is_binary() {
            return None;
        }
        match std::str::from_utf8(blob.content()) {
            Ok(text) => Some(BlobText {
                language,
                text: text.to_string(),
            }),
            Err(_) => {
                debug!("Skipping {:?}: not valid UTF-8", path);
                None
            }
        }
    }
}

fn parse_change(change: PendingChange) -> Option<UastChange> {
    let parse_side = |side: Option<BlobText>| -> Option<crate::uast::Node> {
        let blob = side?;
        match parsers::parse(blob.language, &blob.text) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("Failed to parse {}: {}", change.path, e);
                None
            }
        }
    };

    let before = parse_side(change.before);
    let after = parse_side(change.after);
    if before.is_none() && after.is_none() {
        return None;
    }
    Some(UastChange {
        path: change.path.clone(),
        before,
        after,
    })
}

fn utc_date(seconds: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(seconds, 0).single().map(|dt| dt.date_naive())
}

fn assign_days(commits: &mut [CommitInfo]) {
    let Some(first) = commits.first().and_then(|c| utc_date(c.timestamp)) else {
        return;
    };

    let mut last: Day = 0;
    for commit in commits.iter_mut() {
        let day = utc_date(commit.timestamp)
            .map(|date| (date - first).num_days())
            .and_then(|d| Day::try_from(d).ok())
            .unwrap_or(last);
        last = last.max(day);
        commit.day = last;
    }
}
