use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{ChangeArea, ChangeScanner, CommandRunner, GitError};

pub const UNSTAGED_CHANGES_MESSAGE: &str =
    "There are unstaged changes. Please stage all changes before committing.";

/// Conventional-commit prefix offered by the commit dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
}

impl CommitType {
    pub const ALL: [CommitType; 7] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommitType::Feat => "New feature",
            CommitType::Fix => "Bug fix",
            CommitType::Docs => "Documentation",
            CommitType::Style => "Formatting",
            CommitType::Refactor => "Refactoring",
            CommitType::Test => "Tests",
            CommitType::Chore => "Build / tooling",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CommitType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Unknown commit type: {}", s))
    }
}

/// Applies stage / unstage / discard / commit operations to a working tree.
///
/// Destructive operations run unconditionally; confirming them is the
/// caller's job.
#[derive(Clone)]
pub struct MutationExecutor {
    runner: Arc<dyn CommandRunner>,
    scanner: ChangeScanner,
}

impl MutationExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        let scanner = ChangeScanner::new(runner.clone());
        Self { runner, scanner }
    }

    /// `git add -- <file>`
    pub async fn stage_file(&self, repo: &Path, file: &str) -> Result<(), GitError> {
        self.execute(repo, "add", &["add", "--", file]).await
    }

    /// `git add .`
    pub async fn stage_all(&self, repo: &Path) -> Result<(), GitError> {
        self.execute(repo, "add", &["add", "."]).await
    }

    /// Unstage a staged file, or throw away the working-tree edits of a file.
    pub async fn unstage_or_discard(
        &self,
        repo: &Path,
        file: &str,
        area: ChangeArea,
    ) -> Result<(), GitError> {
        match area {
            ChangeArea::Staged => {
                self.execute(repo, "reset", &["reset", "-q", "HEAD", "--", file])
                    .await
            }
            ChangeArea::Working => {
                self.execute(repo, "checkout", &["checkout", "--", file])
                    .await
            }
        }
    }

    /// `git checkout -- .`, irreversible.
    pub async fn discard_all_working(&self, repo: &Path) -> Result<(), GitError> {
        self.execute(repo, "checkout", &["checkout", "--", "."]).await
    }

    /// Commit the index as `<type>: <message>`.
    ///
    /// The working tree is re-scanned right before committing; any unstaged
    /// change blocks the commit regardless of what the caller believed.
    pub async fn commit(
        &self,
        repo: &Path,
        commit_type: &str,
        message: &str,
    ) -> Result<(), GitError> {
        let commit_type: CommitType = commit_type.parse().map_err(GitError::CommitBlocked)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(GitError::CommitBlocked(
                "Commit message must not be empty.".to_string(),
            ));
        }

        let unstaged = self.scanner.scan_area(repo, ChangeArea::Working).await?;
        if !unstaged.is_empty() {
            warn!(
                repo = %repo.display(),
                unstaged = unstaged.len(),
                "Commit blocked by unstaged changes"
            );
            return Err(GitError::CommitBlocked(UNSTAGED_CHANGES_MESSAGE.to_string()));
        }

        let full_message = format!("{}: {}", commit_type, message);
        self.execute(repo, "commit", &["commit", "-m", &full_message])
            .await
    }

    async fn execute(&self, repo: &Path, operation: &str, args: &[&str]) -> Result<(), GitError> {
        let mutation_error = |message: String| GitError::Mutation {
            repo: repo.to_path_buf(),
            operation: operation.to_string(),
            message,
        };

        let output = self
            .runner
            .run(repo, args)
            .await
            .map_err(|e| mutation_error(e.to_string()))?;

        if !output.success() {
            return Err(mutation_error(output.failure_message()));
        }

        info!(repo = %repo.display(), args = ?args, "Applied git mutation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    const WORKING_SCAN: &[&str] = &["diff", "--no-color", "--name-status", "-z"];

    fn executor(runner: &Arc<ScriptedRunner>) -> MutationExecutor {
        MutationExecutor::new(runner.clone())
    }

    #[test]
    fn test_commit_type_parsing() {
        assert_eq!("fix".parse::<CommitType>(), Ok(CommitType::Fix));
        assert_eq!(" Feat ".parse::<CommitType>(), Ok(CommitType::Feat));
        assert!("wip".parse::<CommitType>().is_err());
        assert_eq!(CommitType::Chore.to_string(), "chore");
    }

    #[tokio::test]
    async fn test_operations_use_argument_arrays() {
        let runner = Arc::new(ScriptedRunner::new());
        let exec = executor(&runner);
        let repo = Path::new("/repo");

        exec.stage_file(repo, "my file.txt").await.unwrap();
        exec.stage_all(repo).await.unwrap();
        exec.unstage_or_discard(repo, "a.txt", ChangeArea::Staged)
            .await
            .unwrap();
        exec.unstage_or_discard(repo, "a.txt", ChangeArea::Working)
            .await
            .unwrap();
        exec.discard_all_working(repo).await.unwrap();

        assert_eq!(runner.count_calls(&["add", "--", "my file.txt"]), 1);
        assert_eq!(runner.count_calls(&["add", "."]), 1);
        assert_eq!(runner.count_calls(&["reset", "-q", "HEAD", "--", "a.txt"]), 1);
        assert_eq!(runner.count_calls(&["checkout", "--", "a.txt"]), 1);
        assert_eq!(runner.count_calls(&["checkout", "--", "."]), 1);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_mutation_error() {
        let runner = Arc::new(ScriptedRunner::new().fail(
            &["add", "--", "ghost.txt"],
            "fatal: pathspec 'ghost.txt' did not match any files",
            128,
        ));

        let err = executor(&runner)
            .stage_file(Path::new("/repo"), "ghost.txt")
            .await
            .unwrap_err();

        match err {
            GitError::Mutation {
                operation, message, ..
            } => {
                assert_eq!(operation, "add");
                assert!(message.contains("did not match any files"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commit_blocked_by_fresh_unstaged_scan() {
        // The caller saw a clean tree, but the re-scan finds an edit.
        let runner = Arc::new(ScriptedRunner::new().respond(WORKING_SCAN, "M\0late-edit.rs\0"));

        let err = executor(&runner)
            .commit(Path::new("/repo"), "fix", "bug")
            .await
            .unwrap_err();

        assert!(err.is_commit_blocked());
        assert_eq!(err.to_string(), UNSTAGED_CHANGES_MESSAGE);
        assert!(!runner.called_subcommand("commit"));
    }

    #[tokio::test]
    async fn test_commit_blocked_by_empty_message_or_unknown_type() {
        let runner = Arc::new(ScriptedRunner::new());
        let exec = executor(&runner);

        let empty = exec.commit(Path::new("/repo"), "fix", "   ").await.unwrap_err();
        let unknown = exec.commit(Path::new("/repo"), "wip", "msg").await.unwrap_err();

        assert!(empty.is_commit_blocked());
        assert!(unknown.is_commit_blocked());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_commit_message_format() {
        let runner = Arc::new(ScriptedRunner::new());

        executor(&runner)
            .commit(Path::new("/repo"), "fix", " bug ")
            .await
            .unwrap();

        assert_eq!(runner.count_calls(&["commit", "-m", "fix: bug"]), 1);
    }

    #[tokio::test]
    async fn test_commit_scan_failure_surfaces() {
        let runner = Arc::new(ScriptedRunner::new().fail(
            WORKING_SCAN,
            "fatal: not a git repository",
            128,
        ));

        let err = executor(&runner)
            .commit(Path::new("/repo"), "feat", "thing")
            .await
            .unwrap_err();

        assert!(matches!(err, GitError::RepositoryAccess { .. }));
        assert!(!runner.called_subcommand("commit"));
    }
}
