use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a file, as reported by git's status letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
    Unknown,
}

impl ChangeKind {
    /// Map a `--name-status` token (`M`, `A`, `D`, `R100`, ...) to a kind.
    pub fn from_status(status: &str) -> Self {
        match status.chars().next() {
            Some('M') => ChangeKind::Modified,
            Some('A') => ChangeKind::Added,
            Some('D') => ChangeKind::Deleted,
            _ => ChangeKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "Modified",
            ChangeKind::Added => "Added",
            ChangeKind::Deleted => "Deleted",
            ChangeKind::Unknown => "Unknown",
        }
    }

    /// Single-letter code, used for badges
    pub fn code(&self) -> char {
        match self {
            ChangeKind::Modified => 'M',
            ChangeKind::Added => 'A',
            ChangeKind::Deleted => 'D',
            ChangeKind::Unknown => 'U',
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the index a change lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeArea {
    /// Working tree vs index (`git diff`)
    Working,
    /// Index vs HEAD (`git diff --staged`)
    Staged,
}

impl ChangeArea {
    pub fn is_staged(&self) -> bool {
        matches!(self, ChangeArea::Staged)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeArea::Working => "working",
            ChangeArea::Staged => "staged",
        }
    }
}

impl fmt::Display for ChangeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "working" | "unstaged" => Ok(ChangeArea::Working),
            "staged" | "index" => Ok(ChangeArea::Staged),
            _ => Err(format!("Unknown change area: {}", s)),
        }
    }
}

/// One changed file on one side of the index.
///
/// A file modified both in the index and in the working tree yields two
/// entries, one per area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    /// Path relative to the repository root
    pub path: String,
    pub kind: ChangeKind,
    /// The status token exactly as git printed it
    pub raw_status: String,
    pub staged: bool,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, raw_status: impl Into<String>, staged: bool) -> Self {
        let raw_status = raw_status.into();
        Self {
            path: path.into(),
            kind: ChangeKind::from_status(&raw_status),
            raw_status,
            staged,
        }
    }

    pub fn area(&self) -> ChangeArea {
        if self.staged {
            ChangeArea::Staged
        } else {
            ChangeArea::Working
        }
    }
}

/// A change together with its unified diff (possibly empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffedEntry {
    #[serde(flatten)]
    pub entry: ChangeEntry,
    pub diff_text: String,
}

impl DiffedEntry {
    pub fn new(entry: ChangeEntry, diff_text: String) -> Self {
        Self { entry, diff_text }
    }
}

/// Both change lists of a repository, in git's order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub working: Vec<ChangeEntry>,
    pub staged: Vec<ChangeEntry>,
}

impl ChangeSet {
    pub fn has_unstaged(&self) -> bool {
        !self.working.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.working.is_empty() && self.staged.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.working.len() + self.staged.len()
    }
}

/// Parse `git diff --name-status` output into entries.
///
/// Accepts both the NUL-separated `-z` form (`M\0path\0R100\0old\0new\0`)
/// and the line form (`M\tpath\n`). Rename and copy records carry two paths;
/// the entry takes the destination.
pub fn parse_name_status(output: &str, staged: bool) -> Vec<ChangeEntry> {
    if output.contains('\0') {
        parse_nul_separated(output, staged)
    } else {
        parse_lines(output, staged)
    }
}

fn has_two_paths(status: &str) -> bool {
    status.starts_with('R') || status.starts_with('C')
}

fn parse_nul_separated(output: &str, staged: bool) -> Vec<ChangeEntry> {
    let mut tokens = output.split('\0').filter(|token| !token.is_empty());
    let mut entries = Vec::new();

    while let Some(status) = tokens.next() {
        // -z output never has newlines between records, but tolerate one.
        let status = status.trim_matches('\n');
        let Some(first) = tokens.next() else {
            break;
        };
        let path = if has_two_paths(status) {
            tokens.next().unwrap_or(first)
        } else {
            first
        };
        entries.push(ChangeEntry::new(path, status, staged));
    }

    entries
}

fn parse_lines(output: &str, staged: bool) -> Vec<ChangeEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let status = fields.next()?.trim();
            let path = fields.last()?;
            if path.is_empty() {
                return None;
            }
            Some(ChangeEntry::new(path, status, staged))
        })
        .collect()
}
