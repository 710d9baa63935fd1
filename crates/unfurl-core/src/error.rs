//! Unified error handling for Unfurl Core.
//!
//! Wraps domain and application errors behind one type so callers get a
//! single `category()` and `suggestions()` surface.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Unfurl Core operations.
#[derive(Debug, Error, Clone)]
pub enum UnfurlError {
    /// Errors from the domain layer (invalid paths, names, empty artifacts).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (filesystem, conflicts, interruption).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl UnfurlError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run 'unfurl config path' to locate the config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Unfurl".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` when the run stopped because it was asked to.
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Interrupted { .. }))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Input,
    Conflict,
    Interrupted,
    Filesystem,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// Problems the user can fix by changing input or arguments.
    pub fn is_user_error(self) -> bool {
        matches!(
            self,
            Self::Validation | Self::Input | Self::Conflict | Self::Interrupted
        )
    }
}

/// Convenient result type alias.
pub type UnfurlResult<T> = Result<T, UnfurlError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> UnfurlResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> UnfurlResult<T> {
        self.map_err(|e| UnfurlError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
