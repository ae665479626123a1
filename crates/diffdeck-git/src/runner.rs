use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

use crate::{CommandOutput, RunnerError};

/// Upper bound for a single git call. Local git is fast; a call this slow is
/// waiting on a lock or a credential prompt.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes git with the given arguments inside a working directory.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, working_dir: &Path, args: &[&str]) -> Result<CommandOutput, RunnerError>;
}

/// Runs the real `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    binary_path: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("git"),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    pub fn with_binary_path(mut self, path: PathBuf) -> Self {
        self.binary_path = path;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GitCli {
    async fn run(&self, working_dir: &Path, args: &[&str]) -> Result<CommandOutput, RunnerError> {
        let start = Instant::now();

        debug!(
            binary = %self.binary_path.display(),
            args = ?args,
            working_dir = %working_dir.display(),
            "Spawning git"
        );

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .current_dir(working_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_OPTIONAL_LOCKS", "0")
            // File names are literal paths, never glob or magic pathspecs.
            .env("GIT_LITERAL_PATHSPECS", "1")
            .stdin(Stdio::null()) // Non-interactive
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(RunnerError::Timeout {
                    command: args.join(" "),
                    timeout: self.timeout,
                });
            }
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        debug!(
            exit_code,
            duration_ms = duration.as_millis(),
            "git completed"
        );

        Ok(CommandOutput::new(
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            duration,
        ))
    }
}
