#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as OsCommand;
use tempfile::TempDir;

pub struct TestRepo {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_path_buf();

        run_git(&path, &["init", "-q"]);
        run_git(&path, &["config", "user.name", "Test"]);
        run_git(&path, &["config", "user.email", "test@example.com"]);
        run_git(&path, &["config", "commit.gpgsign", "false"]);
        run_git(&path, &["config", "core.autocrlf", "false"]);

        TestRepo {
            path,
            _temp_dir: temp_dir,
        }
    }

    pub fn create_file(&self, name: &str, content: &str) {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(file, content).unwrap();
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.path.join(name)).unwrap()
    }

    pub fn add(&self, name: &str) {
        run_git(&self.path, &["add", "--", name]);
    }

    pub fn add_all(&self) {
        run_git(&self.path, &["add", "-A"]);
    }

    pub fn commit(&self, msg: &str) {
        run_git(&self.path, &["commit", "-q", "--allow-empty", "-m", msg]);
    }

    pub fn head_message(&self) -> String {
        let output = OsCommand::new("git")
            .args(["log", "-1", "--format=%s"])
            .current_dir(&self.path)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn commit_count(&self) -> usize {
        let output = OsCommand::new("git")
            .args(["rev-list", "--count", "HEAD"])
            .current_dir(&self.path)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap_or(0)
    }
}

pub fn run_git(dir: &Path, args: &[&str]) {
    let status = OsCommand::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}
