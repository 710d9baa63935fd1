use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Why a definition was not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A file (or other entry) already exists at the target path.
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => f.write_str("already exists"),
        }
    }
}

/// One observable step of a materialization run.
///
/// Events are produced in the order operations occur. Paths are the full
/// target paths (output directory and project root included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MaterializationEvent {
    DirectoryCreated { path: PathBuf },
    FileCreated { path: PathBuf },
    PlaceholderWarning { path: PathBuf },
    FileSkipped { path: PathBuf, reason: SkipReason },
    FileFailed { path: PathBuf, reason: String },
}

impl MaterializationEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryCreated { path }
            | Self::FileCreated { path }
            | Self::PlaceholderWarning { path }
            | Self::FileSkipped { path, .. }
            | Self::FileFailed { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FileFailed { .. })
    }
}

impl fmt::Display for MaterializationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreated { path } => write!(f, "Created directory: {}", path.display()),
            Self::FileCreated { path } => write!(f, "Created: {}", path.display()),
            Self::PlaceholderWarning { path } => {
                write!(f, "Placeholder content in {}, replace it", path.display())
            }
            Self::FileSkipped { path, reason } => {
                write!(f, "Skipped: {} ({})", path.display(), reason)
            }
            Self::FileFailed { path, reason } => {
                write!(f, "Failed: {} ({})", path.display(), reason)
            }
        }
    }
}
