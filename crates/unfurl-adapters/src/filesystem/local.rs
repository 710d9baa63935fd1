//! Local filesystem adapter using std::fs.
//!
//! Files are written to a temporary sibling and published with a
//! no-clobber rename, so a reader sees either nothing or the whole file and
//! an existing entry is never replaced.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::trace;
use unfurl_core::{
    application::{
        ApplicationError,
        ports::{CreateOutcome, Filesystem},
    },
    domain::Permissions,
    error::{UnfurlError, UnfurlResult},
};

const TEMP_PREFIX: &str = ".unfurl-";

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies the name.
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path, permissions: Permissions) -> UnfurlResult<CreateOutcome> {
        match fs::create_dir(path) {
            Ok(()) => {
                apply_permissions(path, permissions)
                    .map_err(|e| map_io_error(path, e, "set permissions on"))?;
                trace!(path = %path.display(), "directory created");
                Ok(CreateOutcome::Created)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(CreateOutcome::AlreadyExists),
            Err(e) => Err(map_io_error(path, e, "create directory")),
        }
    }

    fn write_new_file(
        &self,
        path: &Path,
        content: &str,
        permissions: Permissions,
    ) -> UnfurlResult<CreateOutcome> {
        if self.exists(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| map_io_error(path, e, "create temporary file for"))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.flush())
            .map_err(|e| map_io_error(path, e, "write"))?;
        apply_permissions(temp.path(), permissions)
            .map_err(|e| map_io_error(path, e, "set permissions on"))?;

        // The temporary file is removed on drop if publishing fails.
        match temp.persist_noclobber(path) {
            Ok(_) => {
                trace!(path = %path.display(), bytes = content.len(), "file published");
                Ok(CreateOutcome::Created)
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(map_io_error(path, e.error, "publish")),
        }
    }
}

#[cfg(unix)]
fn apply_permissions(path: &Path, permissions: Permissions) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(permissions.unix_mode()))
}

#[cfg(not(unix))]
fn apply_permissions(_path: &Path, _permissions: Permissions) -> io::Result<()> {
    Ok(())
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> UnfurlError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
