use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::scan::read_repository;
use crate::{ChangeEntry, CommandRunner, DiffedEntry, GitError};

/// Fetches the unified diff for a single change
#[derive(Clone)]
pub struct DiffFetcher {
    runner: Arc<dyn CommandRunner>,
}

impl DiffFetcher {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Diff of `entry` against the side of the index it lives on.
    ///
    /// Empty when git reports no textual difference (mode-only change,
    /// binary file); that is not an error.
    pub async fn fetch(&self, repo: &Path, entry: &ChangeEntry) -> Result<DiffedEntry, GitError> {
        let diff_text = self.fetch_text(repo, entry).await?;
        Ok(DiffedEntry::new(entry.clone(), diff_text))
    }

    pub async fn fetch_text(&self, repo: &Path, entry: &ChangeEntry) -> Result<String, GitError> {
        let path = entry.path.as_str();
        let args: Vec<&str> = if entry.staged {
            vec!["diff", "--staged", "--no-color", "--", path]
        } else {
            vec!["diff", "--no-color", "--", path]
        };

        let diff = read_repository(self.runner.as_ref(), repo, &args).await?;

        debug!(
            repo = %repo.display(),
            path,
            staged = entry.staged,
            diff_len = diff.len(),
            "Fetched diff"
        );

        Ok(diff)
    }
}
