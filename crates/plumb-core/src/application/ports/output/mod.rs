//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `plumb-adapters` crate provides implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::domain::{
    ConfigValidationResult, DependencyRecord, Ecosystem, VulnerabilityRecord,
};
use crate::error::PlumbResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `plumb_adapters::filesystem::LocalFilesystem` (production)
/// - `plumb_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Callers resolve paths through `ProjectRoot` before reaching the port;
///   adapters do not re-check containment
/// - `write_file` creates missing parent directories
pub trait Filesystem: Send + Sync {
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> PlumbResult<String>;

    /// Write content to a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> PlumbResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PlumbResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Rename or move a file. The destination's parent must exist.
    fn rename(&self, from: &Path, to: &Path) -> PlumbResult<()>;

    /// Copy a file byte-for-byte.
    fn copy(&self, from: &Path, to: &Path) -> PlumbResult<()>;

    /// Every regular file under `root`, sorted, skipping directories whose
    /// name is in `skip_dirs`.
    fn list_files(&self, root: &Path, skip_dirs: &[String]) -> PlumbResult<Vec<PathBuf>>;

    /// Unix permission bits, when the platform exposes them.
    fn mode(&self, path: &Path) -> Option<u32>;
}

/// Port for leaf syntax checkers (JSON, TOML, `.env`, ...).
///
/// A checker reports problems inside the result; `Err` means it could not
/// run at all.
pub trait SyntaxChecker: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this checker understands the file at `path`.
    fn supports(&self, path: &Path) -> bool;

    fn validate(&self, path: &Path, content: &str) -> PlumbResult<ConfigValidationResult>;
}

/// Port for dependency manifest parsers.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestParser: Send + Sync {
    fn ecosystem(&self) -> Ecosystem;

    /// Whether `path` is a manifest this parser reads.
    fn matches(&self, path: &Path) -> bool;

    /// Parse declared dependencies. `path` is recorded as each record's source.
    fn parse(&self, path: &Path, content: &str) -> PlumbResult<Vec<DependencyRecord>>;
}

/// Time budget documented for network-backed sources, per lookup.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single advisory lookup. Always recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("lookup timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("advisory source unavailable: {0}")]
    Unavailable(String),
}

/// Port for vulnerability advisory sources.
#[cfg_attr(test, mockall::automock)]
pub trait VulnerabilitySource: Send + Sync {
    fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Vec<VulnerabilityRecord>, LookupError>;
}
