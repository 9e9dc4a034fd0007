//! Errors surfaced by the `plumb` binary and their exit codes.

use std::{error::Error, fmt::Write as _};

use owo_colors::OwoColorize;
use thiserror::Error;

use plumb_core::domain::DomainError;
use plumb_core::error::{ErrorCategory as CoreCategory, PlumbError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments that parse but make no sense together, or a refused action.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A rule id that the registry does not know.
    #[error("Unknown rule '{id}'")]
    UnknownRule { id: String },

    /// Settings that could not be read, merged, or written back.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Core(#[from] PlumbError),

    /// The run finished but the project is not valid.
    #[error("Validation failed: {errors} error(s), {critical} critical")]
    ValidationFailed { errors: usize, critical: usize },

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user answered "no" at the fix prompt.
    #[error("Operation cancelled")]
    Cancelled,

    /// Needs a cargo feature this build was compiled without.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        CliError::Core(err.into())
    }
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        let source: anyhow::Error = source.into();
        Self::ConfigError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Next steps printed under the error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "See `plumb <command> --help`".into(),
            ],

            Self::UnknownRule { id } => vec![
                format!("No rule is registered with id '{id}'"),
                "List the available rules: plumb rules".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Print the config file location: plumb config path".into(),
                "Recreate it with the defaults: plumb init --force".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::ValidationFailed { .. } => vec![
                "Review the issues listed above".into(),
                "Apply automatic fixes: plumb fix --dry-run, then plumb fix".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check that the path is writable by the current user".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{feature}' feature is not available in this build"),
                format!("Install with the feature enabled: cargo install plumb-cli --features {feature}"),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::UnknownRule { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation
                | CoreCategory::Compatibility
                | CoreCategory::Cancelled => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::ValidationFailed { .. } => ErrorCategory::Failed,
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category          | Code |
    /// |-------------------|------|
    /// | Validation failed |  1   |
    /// | Internal          |  1   |
    /// | User error        |  2   |
    /// | Not found         |  3   |
    /// | Configuration     |  4   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Failed | ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
        }
    }

    /// The message block written to stderr: the error, its causes when
    /// `verbose`, then the suggestions. `color` switches ANSI styling on.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: String, style: fn(&str) -> String| {
            if color { style(&text) } else { text }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {}",
            paint("✗ Error:".into(), |t| t.red().bold().to_string()),
            paint(self.to_string(), |t| t.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let _ = writeln!(
                    out,
                    "  {}",
                    paint(format!("caused by: {err}"), |t| t.dimmed().to_string())
                );
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Suggestions:".into(), |t| t.yellow().bold().to_string())
            );
            for suggestion in &suggestions {
                let _ = writeln!(out, "  - {suggestion}");
            }
        }

        if !verbose {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Run with -v for the underlying cause.".into(), |t| {
                    t.dimmed().to_string()
                })
            );
        }

        out
    }

    pub fn log(&self) {
        let code = self.exit_code();
        match self.category() {
            ErrorCategory::Failed => tracing::info!(code, "{self}"),
            ErrorCategory::UserError | ErrorCategory::NotFound => tracing::warn!(code, "{self}"),
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(code, "{self}")
            }
        }

        if let Some(source) = self.source() {
            tracing::debug!(cause = %source, "error source");
        }
    }
}

/// One bucket per exit code (`Failed` and `Internal` share 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The command ran to completion and the project did not pass.
    Failed,
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach a message to an I/O failure at the call site. Core errors need no
/// such hook; `?` converts them through `From`.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
