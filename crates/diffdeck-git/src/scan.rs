use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::{parse_name_status, ChangeArea, ChangeEntry, ChangeSet, CommandRunner, GitError};

/// Lists the changed files of a repository
#[derive(Clone)]
pub struct ChangeScanner {
    runner: Arc<dyn CommandRunner>,
}

impl ChangeScanner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Scan both areas. The two queries are read-only and run concurrently.
    pub async fn scan(&self, repo: &Path) -> Result<ChangeSet, GitError> {
        let (working, staged) = tokio::try_join!(
            self.scan_area(repo, ChangeArea::Working),
            self.scan_area(repo, ChangeArea::Staged),
        )?;

        debug!(
            repo = %repo.display(),
            working = working.len(),
            staged = staged.len(),
            "Scanned changes"
        );

        Ok(ChangeSet { working, staged })
    }

    /// Scan a single area
    pub async fn scan_area(
        &self,
        repo: &Path,
        area: ChangeArea,
    ) -> Result<Vec<ChangeEntry>, GitError> {
        let args: &[&str] = match area {
            ChangeArea::Working => &["diff", "--no-color", "--name-status", "-z"],
            ChangeArea::Staged => &["diff", "--staged", "--no-color", "--name-status", "-z"],
        };

        let stdout = read_repository(self.runner.as_ref(), repo, args).await?;
        Ok(parse_name_status(&stdout, area.is_staged()))
    }
}

/// Run a read-only git query, mapping any failure to `RepositoryAccess`.
pub(crate) async fn read_repository(
    runner: &dyn CommandRunner,
    repo: &Path,
    args: &[&str],
) -> Result<String, GitError> {
    let output = runner
        .run(repo, args)
        .await
        .map_err(|e| GitError::RepositoryAccess {
            repo: repo.to_path_buf(),
            message: e.to_string(),
        })?;

    if !output.success() {
        return Err(GitError::RepositoryAccess {
            repo: repo.to_path_buf(),
            message: output.failure_message(),
        });
    }

    Ok(output.stdout)
}
