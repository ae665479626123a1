use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Git(#[from] diffdeck_git::GitError),

    #[error("Unknown repository: {}", .0.display())]
    UnknownRepository(PathBuf),

    #[error("Duplicate project key: {0}")]
    DuplicateProjectKey(String),

    #[error("Project key must not be empty (path {})", .0.display())]
    EmptyProjectKey(PathBuf),

    #[error("No projects configured")]
    NoProjects,

    #[error("Snapshot task failed: {0}")]
    TaskFailed(String),
}
