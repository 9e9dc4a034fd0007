//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The project root is missing or not a directory.
    #[error("Project root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// A syntax checker could not run at all (not the same as reporting issues).
    #[error("Checker '{checker}' failed on {path}: {reason}")]
    CheckerFailed {
        checker: String,
        path: PathBuf,
        reason: String,
    },

    /// A manifest could not be parsed into dependency records.
    #[error("Could not parse manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// A fix strategy handler failed to build a fix.
    #[error("Fix strategy '{strategy}' failed: {reason}")]
    StrategyFailed {
        strategy: &'static str,
        reason: String,
    },

    /// The caller cancelled the run.
    #[error("Validation cancelled")]
    Cancelled,

    /// Shared state is unusable because a writer panicked.
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
            ],
            Self::RootNotFound { path } => vec![
                format!("Directory does not exist: {}", path.display()),
                "Pass the project directory as the first argument".into(),
            ],
            Self::CheckerFailed { path, .. } | Self::ManifestParse { path, .. } => vec![
                format!("Inspect {} by hand", path.display()),
                "Add the directory to validation.ignore to skip it".into(),
            ],
            Self::Cancelled => vec!["Run the command again to get a full report".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RootNotFound { .. } => ErrorCategory::NotFound,
            Self::ManifestParse { .. } => ErrorCategory::Validation,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::FilesystemError { .. }
            | Self::CheckerFailed { .. }
            | Self::StrategyFailed { .. }
            | Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }
}
