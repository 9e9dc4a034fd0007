// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results are passed by value between services)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Version parsing
    // ========================================================================
    #[error("cannot parse version '{input}': {reason}")]
    VersionParse { input: String, reason: String },

    // ========================================================================
    // Rule registry
    // ========================================================================
    #[error("rule '{id}' is already registered")]
    DuplicateRule { id: String },

    #[error("rule '{id}' not found")]
    RuleNotFound { id: String },

    // ========================================================================
    // Paths
    // ========================================================================
    #[error("path escapes the project root: {path}")]
    PathTraversal { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Fix application
    // ========================================================================
    #[error("file already exists: {path}")]
    AlreadyExists { path: String },

    #[error("file does not exist: {path}")]
    MissingTarget { path: String },

    #[error("line {line} is out of range for {path} ({line_count} lines)")]
    InvalidLine {
        path: String,
        line: usize,
        line_count: usize,
    },

    #[error("invalid fix: {0}")]
    InvalidFix(String),

    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    // ========================================================================
    // Generation gate
    // ========================================================================
    #[error("Required configuration missing: {field}")]
    MissingConfiguration { field: &'static str },

    #[error("template '{template}' targets {ecosystem} but no {ecosystem} versions are configured")]
    MissingEcosystemVersions { ecosystem: String, template: String },

    #[error("{ecosystem} version {found} is below the supported minimum {minimum}")]
    VersionBelowMinimum {
        ecosystem: String,
        found: String,
        minimum: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::VersionParse { input, .. } => vec![
                format!("'{}' is not a recognised version", input),
                "Use MAJOR.MINOR.PATCH, optionally prefixed by >=, >, <=, <, ~ or ^".into(),
            ],
            Self::DuplicateRule { id } => vec![
                format!("A rule with id '{}' already exists", id),
                "Remove the existing rule first or pick a different id".into(),
            ],
            Self::RuleNotFound { id } => vec![
                format!("No rule with id '{}'", id),
                "Try: plumb rules".into(),
            ],
            Self::PathTraversal { .. } => vec![
                "Paths must stay inside the project root".into(),
                "Remove '..' segments from the path".into(),
            ],
            Self::MissingConfiguration { field } => vec![
                format!("Add a '{}' section to the project configuration", field),
                "Try: plumb init".into(),
            ],
            Self::MissingEcosystemVersions { ecosystem, .. } => vec![
                format!("Configure [versions.{}] before generating this template", ecosystem),
            ],
            Self::VersionBelowMinimum { minimum, .. } => {
                vec![format!("Upgrade to at least {}", minimum)]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::VersionParse { .. }
            | Self::InvalidFix(_)
            | Self::UnknownValue { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathTraversal { .. }
            | Self::InvalidLine { .. }
            | Self::AlreadyExists { .. }
            | Self::DuplicateRule { .. } => ErrorCategory::Validation,
            Self::MissingConfiguration { .. }
            | Self::MissingEcosystemVersions { .. }
            | Self::VersionBelowMinimum { .. } => ErrorCategory::Compatibility,
            Self::RuleNotFound { .. } | Self::MissingTarget { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
}
