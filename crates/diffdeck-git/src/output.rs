use std::time::Duration;

/// Output captured from a single git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, decoded lossily as UTF-8
    pub stdout: String,
    /// Standard error, decoded lossily as UTF-8
    pub stderr: String,
    /// Exit code from the process (-1 when killed by a signal)
    pub exit_code: i32,
    /// Wall-clock duration of the call
    pub duration: Duration,
}

impl CommandOutput {
    pub fn new(stdout: String, stderr: String, exit_code: i32, duration: Duration) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            duration,
        }
    }

    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(stdout.into(), String::new(), 0, Duration::ZERO)
    }

    /// Failed output with the given stderr and exit code
    pub fn failed(stderr: impl Into<String>, exit_code: i32) -> Self {
        Self::new(String::new(), stderr.into(), exit_code, Duration::ZERO)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Text describing why the command failed.
    ///
    /// Git writes its diagnostics to stderr, but a few porcelain commands
    /// (`git commit` with nothing staged) report on stdout instead.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exited with code {}", self.exit_code)
    }
}
