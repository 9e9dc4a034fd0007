//! Root error type returned by the public services.
//!
//! Domain rule violations and orchestration failures stay in their own enums;
//! [`PlumbError`] only joins them so callers deal with one type and one
//! [`ErrorCategory`].

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError};

#[derive(Debug, Error, Clone)]
pub enum PlumbError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl PlumbError {
    /// Hints for the person at the terminal, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category().into(),
            Self::Application(e) => e.category(),
        }
    }

    /// A rerun can succeed without changing the project (cancelled runs,
    /// poisoned caches).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::LockPoisoned { .. } | ApplicationError::Cancelled)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Cancelled))
    }
}

/// Coarse grouping used for exit codes and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input: malformed versions, unsafe paths, broken manifests.
    Validation,
    /// The project and the requested template or toolchain disagree.
    Compatibility,
    NotFound,
    Cancelled,
    /// I/O or lock failures outside the user's control.
    Internal,
}

impl From<domain::ErrorCategory> for ErrorCategory {
    fn from(category: domain::ErrorCategory) -> Self {
        match category {
            domain::ErrorCategory::Validation => Self::Validation,
            domain::ErrorCategory::Compatibility => Self::Compatibility,
            domain::ErrorCategory::NotFound => Self::NotFound,
        }
    }
}

pub type PlumbResult<T> = Result<T, PlumbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_categories_are_mapped() {
        let err: PlumbError = DomainError::MissingConfiguration { field: "config" }.into();
        assert_eq!(err.category(), ErrorCategory::Compatibility);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn display_is_the_inner_message() {
        let inner = ApplicationError::RootNotFound {
            path: PathBuf::from("/nowhere"),
        };
        let err = PlumbError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn cancellation_is_retryable() {
        let err = PlumbError::from(ApplicationError::Cancelled);
        assert!(err.is_cancelled());
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Cancelled);
    }
}
