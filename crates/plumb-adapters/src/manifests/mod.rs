//! Dependency manifest parsers, one per ecosystem.

mod cargo;
mod gomod;
mod npm;
mod pip;

use std::path::Path;
use std::sync::Arc;

use plumb_core::application::{ApplicationError, ports::ManifestParser};
use plumb_core::error::PlumbError;

pub use cargo::CargoManifestParser;
pub use gomod::GoModParser;
pub use npm::PackageJsonParser;
pub use pip::RequirementsParser;

/// Every built-in parser.
pub fn builtin_parsers() -> Vec<Arc<dyn ManifestParser>> {
    vec![
        Arc::new(PackageJsonParser),
        Arc::new(GoModParser),
        Arc::new(CargoManifestParser),
        Arc::new(RequirementsParser),
    ]
}

pub(crate) fn named(path: &Path, name: &str) -> bool {
    path.file_name().is_some_and(|n| n == name)
}

pub(crate) fn parse_error(path: &Path, reason: impl Into<String>) -> PlumbError {
    ApplicationError::ManifestParse {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}
