//! A scripted [`CommandRunner`] for tests that should not depend on a git
//! binary.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::{CommandOutput, CommandRunner, RunnerError};

struct Rule {
    repo: Option<PathBuf>,
    args: Vec<String>,
    output: CommandOutput,
    delay: Duration,
}

/// Answers git invocations from a fixed script and records every call.
///
/// Rules match on the exact argument list (and optionally the working
/// directory); later rules win. Unmatched invocations succeed with empty
/// output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, args: &[&str], stdout: &str) -> Self {
        self.push(None, args, CommandOutput::ok(stdout), Duration::ZERO)
    }

    pub fn respond_in(self, repo: &Path, args: &[&str], stdout: &str) -> Self {
        self.push(
            Some(repo.to_path_buf()),
            args,
            CommandOutput::ok(stdout),
            Duration::ZERO,
        )
    }

    /// Respond only after `delay`, to shuffle completion order of concurrent calls.
    pub fn respond_after(self, args: &[&str], stdout: &str, delay: Duration) -> Self {
        self.push(None, args, CommandOutput::ok(stdout), delay)
    }

    pub fn fail(self, args: &[&str], stderr: &str, exit_code: i32) -> Self {
        self.push(
            None,
            args,
            CommandOutput::failed(stderr, exit_code),
            Duration::ZERO,
        )
    }

    pub fn fail_in(self, repo: &Path, args: &[&str], stderr: &str, exit_code: i32) -> Self {
        self.push(
            Some(repo.to_path_buf()),
            args,
            CommandOutput::failed(stderr, exit_code),
            Duration::ZERO,
        )
    }

    fn push(
        mut self,
        repo: Option<PathBuf>,
        args: &[&str],
        output: CommandOutput,
        delay: Duration,
    ) -> Self {
        self.rules.push(Rule {
            repo,
            args: args.iter().map(|a| a.to_string()).collect(),
            output,
            delay,
        });
        self
    }

    /// Every invocation so far, in call order
    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count_calls(&self, args: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|(_, call)| call.iter().map(String::as_str).eq(args.iter().copied()))
            .count()
    }

    /// Whether any call started with the given git subcommand
    pub fn called_subcommand(&self, subcommand: &str) -> bool {
        self.calls()
            .iter()
            .any(|(_, call)| call.first().map(String::as_str) == Some(subcommand))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, working_dir: &Path, args: &[&str]) -> Result<CommandOutput, RunnerError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((
                working_dir.to_path_buf(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
        }

        let rule = self.rules.iter().rev().find(|rule| {
            rule.args.iter().map(String::as_str).eq(args.iter().copied())
                && rule.repo.as_deref().map_or(true, |repo| repo == working_dir)
        });

        match rule {
            Some(rule) => {
                if !rule.delay.is_zero() {
                    tokio::time::sleep(rule.delay).await;
                }
                Ok(rule.output.clone())
            }
            None => Ok(CommandOutput::ok("")),
        }
    }
}
