use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures of the process boundary itself, before git had a say.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

#[derive(Error, Debug)]
pub enum GitError {
    /// Reading the repository failed: not a repository, missing path, permissions.
    #[error("Cannot read repository {}: {message}", repo.display())]
    RepositoryAccess { repo: PathBuf, message: String },

    /// A mutating git command returned non-zero (or never finished).
    #[error("git {operation} failed in {}: {message}", repo.display())]
    Mutation {
        repo: PathBuf,
        operation: String,
        message: String,
    },

    /// The commit precondition did not hold; git was never asked to commit.
    #[error("{0}")]
    CommitBlocked(String),
}

impl GitError {
    pub fn is_commit_blocked(&self) -> bool {
        matches!(self, GitError::CommitBlocked(_))
    }
}
