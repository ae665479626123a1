use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use diffdeck_git::{ChangeEntry, ChangeScanner, CommandRunner, DiffFetcher, DiffedEntry};

use crate::{Project, ProjectMap, ProjectSnapshot, RepositorySnapshot, SnapshotError};

/// Cap on git processes spawned at once for diff fetching
pub const DEFAULT_MAX_CONCURRENT_GIT: usize = 16;

/// Builds snapshots for the configured projects
#[derive(Clone)]
pub struct SnapshotAssembler {
    scanner: ChangeScanner,
    fetcher: DiffFetcher,
    projects: ProjectMap,
    permits: Arc<Semaphore>,
}

impl SnapshotAssembler {
    pub fn new(runner: Arc<dyn CommandRunner>, projects: ProjectMap) -> Self {
        Self {
            scanner: ChangeScanner::new(runner.clone()),
            fetcher: DiffFetcher::new(runner),
            projects,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_GIT)),
        }
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    pub fn projects(&self) -> &ProjectMap {
        &self.projects
    }

    /// Snapshot every configured project
    pub async fn assemble_all(&self) -> Result<Vec<ProjectSnapshot>, SnapshotError> {
        self.assemble(self.projects.projects().to_vec()).await
    }

    /// Snapshot the projects at `paths` (all of them when empty)
    pub async fn assemble_paths(
        &self,
        paths: &[PathBuf],
    ) -> Result<Vec<ProjectSnapshot>, SnapshotError> {
        let selected = self.projects.resolve(paths)?;
        self.assemble(selected).await
    }

    /// Snapshot `projects` concurrently.
    ///
    /// All-or-nothing: the first failing repository fails the whole request
    /// and the remaining work is aborted.
    pub async fn assemble(
        &self,
        projects: Vec<Project>,
    ) -> Result<Vec<ProjectSnapshot>, SnapshotError> {
        let count = projects.len();
        let mut tasks = JoinSet::new();

        for (index, project) in projects.into_iter().enumerate() {
            let assembler = self.clone();
            tasks.spawn(async move {
                let result = assembler
                    .snapshot_repository(&project.path)
                    .await
                    .map(|repository| ProjectSnapshot {
                        project_key: project.key,
                        repository,
                    });
                (index, result)
            });
        }

        let snapshots = collect_in_order(tasks, count).await?;
        info!(projects = snapshots.len(), "Assembled snapshot");
        Ok(snapshots)
    }

    /// Scan one repository and fetch the diff of every entry
    pub async fn snapshot_repository(
        &self,
        repo: &Path,
    ) -> Result<RepositorySnapshot, SnapshotError> {
        let changes = self.scanner.scan(repo).await?;

        let (working_entries, staged_entries) = tokio::try_join!(
            self.fetch_all(repo, changes.working),
            self.fetch_all(repo, changes.staged),
        )?;

        debug!(
            repo = %repo.display(),
            working = working_entries.len(),
            staged = staged_entries.len(),
            "Snapshot of repository complete"
        );

        Ok(RepositorySnapshot {
            repo_path: repo.to_path_buf(),
            working_entries,
            staged_entries,
        })
    }

    async fn fetch_all(
        &self,
        repo: &Path,
        entries: Vec<ChangeEntry>,
    ) -> Result<Vec<DiffedEntry>, SnapshotError> {
        let count = entries.len();
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let permits = self.permits.clone();
            let repo = repo.to_path_buf();
            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => fetcher.fetch(&repo, &entry).await.map_err(SnapshotError::from),
                    Err(e) => Err(SnapshotError::TaskFailed(e.to_string())),
                };
                (index, result)
            });
        }

        collect_in_order(tasks, count).await
    }
}

/// Drain `tasks`, placing each result at its original index.
///
/// Returning early drops the `JoinSet`, which aborts whatever is still
/// running.
async fn collect_in_order<T: Send + 'static>(
    mut tasks: JoinSet<(usize, Result<T, SnapshotError>)>,
    count: usize,
) -> Result<Vec<T>, SnapshotError> {
    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|e| SnapshotError::TaskFailed(e.to_string()))?;
        slots[index] = Some(result?);
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffdeck_git::testing::ScriptedRunner;
    use diffdeck_git::GitError;
    use std::time::Duration;

    const WORKING: &[&str] = &["diff", "--no-color", "--name-status", "-z"];
    const STAGED: &[&str] = &["diff", "--staged", "--no-color", "--name-status", "-z"];

    fn two_projects() -> ProjectMap {
        ProjectMap::new(vec![
            Project::new("en", "/srv/en"),
            Project::new("de", "/srv/de"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_diff_order_matches_scan_order() {
        // First file's diff is slowest, so completions arrive reversed.
        let runner = Arc::new(
            ScriptedRunner::new()
                .respond(WORKING, "M\0a.txt\0M\0b.txt\0M\0c.txt\0")
                .respond_after(
                    &["diff", "--no-color", "--", "a.txt"],
                    "diff a",
                    Duration::from_millis(60),
                )
                .respond_after(
                    &["diff", "--no-color", "--", "b.txt"],
                    "diff b",
                    Duration::from_millis(30),
                )
                .respond(&["diff", "--no-color", "--", "c.txt"], "diff c"),
        );
        let assembler = SnapshotAssembler::new(runner, ProjectMap::single("/repo"));

        let snapshot = assembler
            .snapshot_repository(Path::new("/repo"))
            .await
            .unwrap();

        let diffs: Vec<_> = snapshot
            .working_entries
            .iter()
            .map(|e| (e.entry.path.as_str(), e.diff_text.as_str()))
            .collect();
        assert_eq!(
            diffs,
            vec![("a.txt", "diff a"), ("b.txt", "diff b"), ("c.txt", "diff c")]
        );
        assert!(snapshot.staged_entries.is_empty());
    }

    #[tokio::test]
    async fn test_projects_keep_map_order() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .respond_in(Path::new("/srv/en"), STAGED, "A\0en.txt\0")
                .respond_in(Path::new("/srv/de"), STAGED, "A\0de.txt\0"),
        );
        let assembler = SnapshotAssembler::new(runner, two_projects());

        let snapshots = assembler.assemble_all().await.unwrap();

        let keys: Vec<_> = snapshots.iter().map(|s| s.project_key.as_str()).collect();
        assert_eq!(keys, vec!["en", "de"]);
        assert_eq!(snapshots[1].repository.staged_entries[0].entry.path, "de.txt");
        assert_eq!(snapshots[1].repo_path(), Path::new("/srv/de"));
    }

    #[tokio::test]
    async fn test_one_failing_repository_fails_everything() {
        let runner = Arc::new(ScriptedRunner::new().fail_in(
            Path::new("/srv/de"),
            WORKING,
            "fatal: not a git repository",
            128,
        ));
        let assembler = SnapshotAssembler::new(runner, two_projects());

        let err = assembler.assemble_all().await.unwrap_err();

        assert!(matches!(
            err,
            SnapshotError::Git(GitError::RepositoryAccess { ref repo, .. }) if repo == Path::new("/srv/de")
        ));
    }

    #[tokio::test]
    async fn test_failing_diff_fails_snapshot() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .respond(WORKING, "M\0a.txt\0")
                .fail(&["diff", "--no-color", "--", "a.txt"], "fatal: broken", 128),
        );
        let assembler = SnapshotAssembler::new(runner, ProjectMap::single("/repo"));

        assert!(assembler.assemble_all().await.is_err());
    }

    #[tokio::test]
    async fn test_assemble_paths_rejects_unknown() {
        let assembler = SnapshotAssembler::new(Arc::new(ScriptedRunner::new()), two_projects());

        let err = assembler
            .assemble_paths(&[PathBuf::from("/somewhere/else")])
            .await
            .unwrap_err();

        assert!(matches!(err, SnapshotError::UnknownRepository(_)));
    }

    #[tokio::test]
    async fn test_assemble_paths_subset() {
        let assembler = SnapshotAssembler::new(Arc::new(ScriptedRunner::new()), two_projects())
            .with_max_concurrency(1);

        let snapshots = assembler
            .assemble_paths(&[PathBuf::from("/srv/de")])
            .await
            .unwrap();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].project_key, "de");
        assert!(snapshots[0].repository.is_clean());
    }
}
