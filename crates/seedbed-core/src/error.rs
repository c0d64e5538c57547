//! Unified error handling for seedbed-core.
//!
//! Wraps configuration and application errors in one type with
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ConfigError;

/// Root error type for seedbed-core operations.
#[derive(Debug, Error, Clone)]
pub enum SeedbedError {
    /// The configuration document is invalid. Raised before any write.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Orchestration failures (filesystem, fatal tool steps).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SeedbedError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in seedbed".into(),
                "Re-run with -vvv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// True when the failure happened before anything was written.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    ExternalTool,
    Filesystem,
    Internal,
}

/// Convenient result type alias.
pub type SeedbedResult<T> = Result<T, SeedbedError>;
