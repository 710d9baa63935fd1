//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The input held no file definitions at all.
    #[error("No file definitions found in the input")]
    EmptyInput,

    /// The project root already exists and its name may not be changed.
    #[error("Project directory already exists: {}", path.display())]
    NameConflict { path: PathBuf },

    /// The parent of the project root is missing.
    #[error("Output directory does not exist: {}", path.display())]
    OutputDirMissing { path: PathBuf },

    /// An input source could not be read.
    #[error("Cannot read input {source_name}: {reason}")]
    InputUnreadable { source_name: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// A generated name turned out to be taken.
    #[error("Invariant violated: {reason}")]
    InvariantViolation { reason: String },

    /// Cancellation was requested mid-run.
    #[error("Interrupted after {completed} file definition(s)")]
    Interrupted { completed: usize },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyInput => vec![
                "The input must contain at least one marker line such as '// src/main.rs'".into(),
                "Check that the artifact was copied completely".into(),
            ],
            Self::NameConflict { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Remove or rename the existing directory".into(),
                "Or pick another name with --name".into(),
            ],
            Self::OutputDirMissing { path } => vec![
                format!("Create it first: mkdir -p {}", path.display()),
                "Or point --output-dir at an existing directory".into(),
            ],
            Self::InputUnreadable { source_name, .. } => vec![
                format!("Check that {} exists and is readable", source_name),
                "Input must be UTF-8 text".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::InvariantViolation { .. } => vec![
                "Another process may be writing to the output directory".into(),
                "Try again".into(),
            ],
            Self::Interrupted { .. } => vec![
                "Files written before the interruption are complete".into(),
                "A re-run needs a new project name (--name) or the partial directory removed first".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::OutputDirMissing { .. } => ErrorCategory::Input,
            Self::NameConflict { .. } => ErrorCategory::Conflict,
            Self::InputUnreadable { .. } | Self::FilesystemError { .. } => {
                ErrorCategory::Filesystem
            }
            Self::InvariantViolation { .. } => ErrorCategory::Internal,
            Self::Interrupted { .. } => ErrorCategory::Interrupted,
        }
    }
}
