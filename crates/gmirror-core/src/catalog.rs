use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::MirrorError;

/// Repository name (e.g. `team/proj`) to clone URL, as reported by a host catalog.
pub type RepoMap = BTreeMap<String, String>;

/// Keep only the repos whose name contains `pattern`.
pub fn filter_by_name(repos: RepoMap, pattern: &str) -> RepoMap {
    repos
        .into_iter()
        .filter(|(name, _)| name.contains(pattern))
        .collect()
}

/// Where a repo's bare mirror lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorTarget {
    /// Directory holding the mirror; the clone runs from here.
    pub parent: PathBuf,
    /// Mirror directory name, `<last segment>.git`.
    pub base: String,
}

impl MirrorTarget {
    /// Map a catalog name onto `root`: `team/sub/proj` becomes
    /// `root/team/sub` + `proj.git`.
    pub fn for_name(root: &Path, name: &str) -> Result<Self, MirrorError> {
        let mut segments: Vec<&str> = name
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();

        if segments.contains(&"..") {
            return Err(MirrorError::InvalidName {
                name: name.to_string(),
            });
        }

        let last = segments.pop().ok_or_else(|| MirrorError::InvalidName {
            name: name.to_string(),
        })?;

        let mut parent = root.to_path_buf();
        parent.extend(segments);

        Ok(Self {
            parent,
            base: format!("{last}.git"),
        })
    }

    /// Full path of the mirror directory.
    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.base)
    }
}
