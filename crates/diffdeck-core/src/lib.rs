//! # diffdeck-core
//!
//! Builds point-in-time change snapshots for a fixed set of repositories.
//!
//! A [`ProjectMap`] is injected at startup and never changes afterwards;
//! single-repository mode is simply a map with one entry. The
//! [`SnapshotAssembler`] scans every repository and fetches every diff
//! concurrently, then hands back one [`ProjectSnapshot`] per project in map
//! order. Snapshots are rebuilt from scratch on every request.

mod assembler;
mod error;
mod projects;
mod snapshot;

pub use assembler::{SnapshotAssembler, DEFAULT_MAX_CONCURRENT_GIT};
pub use error::SnapshotError;
pub use projects::{Project, ProjectMap};
pub use snapshot::{AreaStats, ProjectSnapshot, RepositorySnapshot};
