//! Configuration file support for diffdeck.
//!
//! Loads `diffdeck.toml` from the working directory, an explicit `--config`
//! path, or the user config directory, and merges it with CLI flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use diffdeck_core::{Project, ProjectMap};
use diffdeck_git::DEFAULT_GIT_TIMEOUT;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "diffdeck.toml";

pub const DEFAULT_PORT: u16 = 6060;

/// Contents of `diffdeck.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Control server port
    pub port: Option<u16>,
    /// Upper bound for a single git call, e.g. "30s"
    #[serde(default, with = "humantime_serde")]
    pub git_timeout: Option<Duration>,
    /// Repositories to show, in tab order
    #[serde(default, rename = "project")]
    pub projects: Vec<Project>,
}

impl FileConfig {
    /// Load configuration.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if a file exists and parses successfully
    /// - `Ok(None)` if no file exists
    /// - `Err(...)` if a file exists but fails to parse, or an explicit path is missing
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load_from(path).map(Some);
        }

        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from(&local).map(Some);
        }

        match user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// `~/.config/diffdeck/config.toml` (platform equivalent)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("diffdeck").join("config.toml"))
}

/// Effective settings after merging CLI flags and the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub projects: ProjectMap,
    pub port: u16,
    pub git_timeout: Duration,
}

/// Settings supplied on the command line
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub path: Option<PathBuf>,
    pub projects: Vec<Project>,
    pub port: Option<u16>,
}

impl Settings {
    /// Project map priority: `--project` flags > config `[[project]]` > `--path` > cwd.
    /// Port priority: `--port` > config > default.
    pub fn resolve(
        cli: CliOverrides,
        file: Option<FileConfig>,
        working_dir: &Path,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();

        let projects = if !cli.projects.is_empty() {
            ProjectMap::new(absolutize_all(cli.projects, working_dir))?
        } else if !file.projects.is_empty() {
            ProjectMap::new(absolutize_all(file.projects, working_dir))?
        } else {
            let path = cli.path.unwrap_or_else(|| working_dir.to_path_buf());
            ProjectMap::single(absolutize(path, working_dir))
        };

        Ok(Self {
            projects,
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            git_timeout: file.git_timeout.unwrap_or(DEFAULT_GIT_TIMEOUT),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

/// Parse a `key=path` CLI value
pub fn parse_project(value: &str) -> Result<Project, String> {
    let (key, path) = value
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=PATH, got '{}'", value))?;
    let key = key.trim();
    if key.is_empty() || path.trim().is_empty() {
        return Err(format!("Expected KEY=PATH, got '{}'", value));
    }
    Ok(Project::new(key, path.trim()))
}

fn absolutize(path: PathBuf, working_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        working_dir.join(path)
    }
}

fn absolutize_all(projects: Vec<Project>, working_dir: &Path) -> Vec<Project> {
    projects
        .into_iter()
        .map(|p| Project::new(p.key, absolutize(p.path, working_dir)))
        .collect()
}
