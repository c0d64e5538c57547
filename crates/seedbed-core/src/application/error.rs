//! Application layer errors.
//!
//! These are orchestration failures that abort a run after validation has
//! passed. Configuration problems are `ConfigError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A planned directory collides with an existing file, or a planned
    /// file with an existing directory.
    #[error("Path conflict at {path}: an entry of the other kind already exists")]
    PathConflict { path: PathBuf },

    /// Manifest or repository initialization failed.
    #[error("External tool failed during {step}: {reason}")]
    ExternalToolFatal { step: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The run state machine was driven out of order.
    #[error("Invalid run transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PathConflict { path } => vec![
                format!("Remove or rename {}", path.display()),
                "Or choose another --output-dir".into(),
            ],
            Self::ExternalToolFatal { step, .. } => vec![
                format!("Check that the tool used for {step} is installed and on PATH"),
                "Files written so far are kept; re-running after the fix is safe".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::InvalidTransition { .. } => vec![
                "This is a bug in seedbed".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PathConflict { .. } => ErrorCategory::Conflict,
            Self::ExternalToolFatal { .. } => ErrorCategory::ExternalTool,
            Self::FilesystemError { .. } => ErrorCategory::Filesystem,
            Self::InvalidTransition { .. } => ErrorCategory::Internal,
        }
    }
}
