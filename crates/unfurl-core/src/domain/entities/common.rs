use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{DomainError, DomainValidator};

/// A validated, forward-slash separated relative path.
///
/// Invariant: never empty, never absolute, no `.`/`..`/empty segments and
/// no backslashes. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        DomainValidator::validate_relative_path(&path)?;
        Ok(Self(path))
    }

    /// The path exactly as written in the artifact.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Final segment (the file name).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Number of parent directories.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    /// Parent directories from shallowest to deepest, each as a prefix of
    /// this path. `a/b/c.txt` yields `a` then `a/b`.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.0
            .match_indices('/')
            .map(move |(idx, _)| &self.0[..idx])
    }

    /// Convert into a native path below `root`.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mode of a generated entry.
///
/// Owner reads and writes, group and others only read; `executable` adds
/// the search/execute bit for everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    executable: bool,
}

impl Permissions {
    /// `rw-r--r--`: every generated file.
    pub const fn read_write() -> Self {
        Self { executable: false }
    }

    /// `rwxr-xr-x`: every generated directory.
    pub const fn full() -> Self {
        Self { executable: true }
    }

    pub const fn unix_mode(&self) -> u32 {
        if self.executable { 0o755 } else { 0o644 }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_ancestors_are_prefixes() {
        let path = RelativePath::try_new("a/b/c.txt").unwrap();
        let ancestors: Vec<_> = path.ancestors().collect();
        assert_eq!(ancestors, vec!["a", "a/b"]);
        assert_eq!(path.file_name(), "c.txt");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn root_level_path_has_no_ancestors() {
        let path = RelativePath::try_new("README.md").unwrap();
        assert_eq!(path.ancestors().count(), 0);
        assert_eq!(path.file_name(), "README.md");
    }

    #[test]
    fn to_native_joins_segments() {
        let path = RelativePath::try_new("src/lib/mod.rs").unwrap();
        let native = path.to_native(Path::new("out"));
        assert_eq!(native, Path::new("out").join("src").join("lib").join("mod.rs"));
    }

    #[test]
    fn invalid_path_rejected() {
        assert!(RelativePath::try_new("../x").is_err());
        assert!(RelativePath::try_from("/abs").is_err());
    }

    #[test]
    fn permission_modes() {
        assert_eq!(Permissions::read_write().unix_mode(), 0o644);
        assert_eq!(Permissions::full().unix_mode(), 0o755);
        assert_eq!(Permissions::default(), Permissions::read_write());
    }
}
