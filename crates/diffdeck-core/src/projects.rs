use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::SnapshotError;

/// A repository shown as one tab of the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Short identifier, e.g. `en`
    pub key: String,
    /// Working tree root. Not checked for existence; git reports that.
    pub path: PathBuf,
}

impl Project {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }

    /// A project keyed by the last component of its path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "repo".to_string());
        Self { key, path }
    }
}

/// The ordered, fixed set of repositories the process serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMap {
    projects: Vec<Project>,
}

impl ProjectMap {
    /// Build a map, rejecting empty input, empty keys and duplicate keys.
    pub fn new(projects: Vec<Project>) -> Result<Self, SnapshotError> {
        if projects.is_empty() {
            return Err(SnapshotError::NoProjects);
        }

        let mut seen = HashSet::new();
        for project in &projects {
            if project.key.trim().is_empty() {
                return Err(SnapshotError::EmptyProjectKey(project.path.clone()));
            }
            if !seen.insert(project.key.as_str()) {
                return Err(SnapshotError::DuplicateProjectKey(project.key.clone()));
            }
        }

        Ok(Self { projects })
    }

    /// Single-repository mode
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            projects: vec![Project::from_path(path)],
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&Project> {
        self.projects.iter().find(|p| p.path == path)
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.find_by_path(path).is_some()
    }

    /// Look up every path, keeping the caller's order.
    ///
    /// An empty list selects every project.
    pub fn resolve(&self, paths: &[PathBuf]) -> Result<Vec<Project>, SnapshotError> {
        if paths.is_empty() {
            return Ok(self.projects.clone());
        }

        paths
            .iter()
            .map(|path| {
                self.find_by_path(path)
                    .cloned()
                    .ok_or_else(|| SnapshotError::UnknownRepository(path.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ProjectMap {
        ProjectMap::new(vec![
            Project::new("en", "/srv/en"),
            Project::new("de", "/srv/de"),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_uses_directory_name() {
        let map = ProjectMap::single("/home/user/my-site");
        assert_eq!(map.len(), 1);
        assert_eq!(map.projects()[0].key, "my-site");
    }

    #[test]
    fn test_from_root_path_falls_back() {
        assert_eq!(Project::from_path("/").key, "repo");
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let dup = ProjectMap::new(vec![
            Project::new("en", "/a"),
            Project::new("en", "/b"),
        ]);
        assert!(matches!(dup, Err(SnapshotError::DuplicateProjectKey(k)) if k == "en"));

        let empty_key = ProjectMap::new(vec![Project::new(" ", "/a")]);
        assert!(matches!(empty_key, Err(SnapshotError::EmptyProjectKey(_))));

        assert!(matches!(
            ProjectMap::new(Vec::new()),
            Err(SnapshotError::NoProjects)
        ));
    }

    #[test]
    fn test_resolve_keeps_request_order() {
        let resolved = map()
            .resolve(&[PathBuf::from("/srv/de"), PathBuf::from("/srv/en/")])
            .unwrap();
        let keys: Vec<_> = resolved.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["de", "en"]);
    }

    #[test]
    fn test_resolve_empty_selects_all() {
        assert_eq!(map().resolve(&[]).unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_unknown_path() {
        let err = map().resolve(&[PathBuf::from("/etc")]).unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownRepository(p) if p == Path::new("/etc")));
    }
}
