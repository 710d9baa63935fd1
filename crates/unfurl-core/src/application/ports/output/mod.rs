//! Driven (output) ports - implemented by infrastructure.
//!
//! The `unfurl-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::Permissions;
use crate::error::UnfurlResult;

/// Result of a create-if-absent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `unfurl_adapters::filesystem::LocalFilesystem` (production)
/// - `unfurl_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Neither operation ever replaces an existing entry.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a single directory level. The parent must exist.
    fn create_dir(&self, path: &Path, permissions: Permissions) -> UnfurlResult<CreateOutcome>;

    /// Write a new file in one step; readers never observe partial content.
    /// An existing file is left untouched and reported as `AlreadyExists`.
    fn write_new_file(
        &self,
        path: &Path,
        content: &str,
        permissions: Permissions,
    ) -> UnfurlResult<CreateOutcome>;
}
