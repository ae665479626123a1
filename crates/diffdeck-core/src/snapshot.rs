use serde::Serialize;
use std::path::PathBuf;

use diffdeck_git::{ChangeKind, DiffedEntry};

/// Per-kind counts of one change list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AreaStats {
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
    pub unknown: usize,
}

impl AreaStats {
    pub fn from_entries(entries: &[DiffedEntry]) -> Self {
        entries
            .iter()
            .fold(AreaStats::default(), |mut stats, diffed| {
                match diffed.entry.kind {
                    ChangeKind::Modified => stats.modified += 1,
                    ChangeKind::Added => stats.added += 1,
                    ChangeKind::Deleted => stats.deleted += 1,
                    ChangeKind::Unknown => stats.unknown += 1,
                }
                stats
            })
    }

    pub fn total(&self) -> usize {
        self.modified + self.added + self.deleted + self.unknown
    }
}

/// Staged and unstaged changes of one repository at one point in time.
///
/// Entry order is git's own listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    pub repo_path: PathBuf,
    pub working_entries: Vec<DiffedEntry>,
    pub staged_entries: Vec<DiffedEntry>,
}

impl RepositorySnapshot {
    pub fn working_stats(&self) -> AreaStats {
        AreaStats::from_entries(&self.working_entries)
    }

    pub fn staged_stats(&self) -> AreaStats {
        AreaStats::from_entries(&self.staged_entries)
    }

    pub fn has_unstaged(&self) -> bool {
        !self.working_entries.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.working_entries.is_empty() && self.staged_entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub project_key: String,
    #[serde(flatten)]
    pub repository: RepositorySnapshot,
}

impl ProjectSnapshot {
    pub fn repo_path(&self) -> &std::path::Path {
        &self.repository.repo_path
    }
}
