use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use diffdeck_core::{Project, ProjectMap, SnapshotAssembler};
use diffdeck_git::{ChangeKind, GitCli};
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.name", "Test"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    git(dir.path(), &["add", "-A"]);
    git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "initial"]);
    dir
}

#[tokio::test]
async fn test_snapshot_of_two_repositories() {
    let en = init_repo(&[("index.html", "<p>hello</p>\n")]);
    let de = init_repo(&[("index.html", "<p>hallo</p>\n")]);

    fs::write(en.path().join("index.html"), "<p>hello world</p>\n").unwrap();
    fs::write(de.path().join("neu.html"), "<p>neu</p>\n").unwrap();
    git(de.path(), &["add", "neu.html"]);

    let projects = ProjectMap::new(vec![
        Project::new("en", en.path()),
        Project::new("de", de.path()),
    ])
    .unwrap();
    let assembler = SnapshotAssembler::new(Arc::new(GitCli::new()), projects);

    let snapshots = assembler.assemble_all().await.unwrap();

    assert_eq!(snapshots.len(), 2);

    let en_snap = &snapshots[0].repository;
    assert_eq!(snapshots[0].project_key, "en");
    assert_eq!(en_snap.working_entries.len(), 1);
    assert_eq!(en_snap.working_entries[0].entry.kind, ChangeKind::Modified);
    assert!(en_snap.working_entries[0].diff_text.contains("+<p>hello world</p>"));
    assert!(en_snap.staged_entries.is_empty());

    let de_snap = &snapshots[1].repository;
    assert!(de_snap.working_entries.is_empty());
    assert_eq!(de_snap.staged_entries[0].entry.path, "neu.html");
    assert_eq!(de_snap.staged_entries[0].entry.kind, ChangeKind::Added);
}

#[tokio::test]
async fn test_missing_repository_fails_whole_snapshot() {
    let good = init_repo(&[("a.txt", "a\n")]);
    let missing = TempDir::new().unwrap();

    let projects = ProjectMap::new(vec![
        Project::new("good", good.path()),
        Project::new("missing", missing.path().join("gone")),
    ])
    .unwrap();
    let assembler = SnapshotAssembler::new(Arc::new(GitCli::new()), projects);

    assert!(assembler.assemble_all().await.is_err());
}
