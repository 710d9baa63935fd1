//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use unfurl_core::{
    application::{
        ApplicationError,
        ports::{CreateOutcome, Filesystem},
    },
    domain::Permissions,
    error::{UnfurlError, UnfurlResult},
};

/// In-memory filesystem for testing.
///
/// Follows the same rules as the local adapter: a parent directory must
/// exist, and nothing is ever replaced. Paths registered with
/// [`MemoryFilesystem::fail_on`] make the next operation on them fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, (String, u32)>,
    directories: BTreeMap<PathBuf, u32>,
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filesystem with `dir` (and every ancestor) already present.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let fs = Self::new();
        fs.add_dir(dir);
        fs
    }

    /// Register a directory and its ancestors (testing helper).
    pub fn add_dir(&self, dir: impl AsRef<Path>) {
        let mut inner = self.write_lock_unchecked();
        let mut current = PathBuf::new();
        for component in dir.as_ref().components() {
            current.push(component);
            inner
                .directories
                .entry(current.clone())
                .or_insert(Permissions::full().unix_mode());
        }
    }

    /// Place a file without the usual checks (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.write_lock_unchecked().files.insert(
            path.to_path_buf(),
            (content.to_owned(), Permissions::read_write().unix_mode()),
        );
    }

    /// Make operations on `path` fail.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.write_lock_unchecked()
            .failing
            .insert(path.as_ref().to_path_buf());
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).map(|(content, _)| content.clone())
    }

    /// Unix mode recorded for a file or directory.
    pub fn mode_of(&self, path: &Path) -> Option<u32> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .map(|(_, mode)| *mode)
            .or_else(|| inner.directories.get(path).copied())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> UnfurlResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> UnfurlResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }

    fn write_lock_unchecked(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn poisoned() -> UnfurlError {
    UnfurlError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn injected(path: &Path) -> UnfurlError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "injected failure".into(),
    }
    .into()
}

impl MemoryFilesystemInner {
    fn occupied(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains_key(path)
    }

    fn check_parent(&self, path: &Path) -> UnfurlResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains_key(parent) => {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.read().map(|inner| inner.occupied(path)).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains_key(path))
            .unwrap_or(false)
    }

    fn create_dir(&self, path: &Path, permissions: Permissions) -> UnfurlResult<CreateOutcome> {
        let mut inner = self.write()?;
        if inner.failing.contains(path) {
            return Err(injected(path));
        }
        if inner.occupied(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        inner.check_parent(path)?;
        inner
            .directories
            .insert(path.to_path_buf(), permissions.unix_mode());
        Ok(CreateOutcome::Created)
    }

    fn write_new_file(
        &self,
        path: &Path,
        content: &str,
        permissions: Permissions,
    ) -> UnfurlResult<CreateOutcome> {
        let mut inner = self.write()?;
        if inner.failing.contains(path) {
            return Err(injected(path));
        }
        if inner.occupied(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        inner.check_parent(path)?;
        inner.files.insert(
            path.to_path_buf(),
            (content.to_owned(), permissions.unix_mode()),
        );
        Ok(CreateOutcome::Created)
    }
}
