//! # diffdeck-git
//!
//! Git plumbing for diffdeck.
//!
//! Everything here shells out to the `git` binary; git is the only source of
//! truth about a repository. Commands are always spawned with an argument
//! array, never through a shell, so file paths reach git verbatim.
//!
//! ## Key Types
//!
//! - [`CommandRunner`] - The I/O seam every git call goes through
//! - [`GitCli`] - Production runner spawning `git` with a timeout
//! - [`ChangeScanner`] - Lists unstaged and staged changes of a repository
//! - [`DiffFetcher`] - Fetches the unified diff of a single change
//! - [`MutationExecutor`] - Stage, unstage, discard and commit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use diffdeck_git::{ChangeScanner, GitCli};
//!
//! let scanner = ChangeScanner::new(Arc::new(GitCli::new()));
//! let changes = scanner.scan(repo_path).await?;
//!
//! for entry in &changes.working {
//!     println!("{} {}", entry.kind, entry.path);
//! }
//! ```

mod diff;
mod error;
mod mutation;
mod output;
mod runner;
mod scan;
mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use diff::DiffFetcher;
pub use error::{GitError, RunnerError};
pub use mutation::{CommitType, MutationExecutor, UNSTAGED_CHANGES_MESSAGE};
pub use output::CommandOutput;
pub use runner::{CommandRunner, GitCli, DEFAULT_GIT_TIMEOUT};
pub use scan::ChangeScanner;
pub use status::{parse_name_status, ChangeArea, ChangeEntry, ChangeKind, ChangeSet, DiffedEntry};
