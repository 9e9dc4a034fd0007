//! Infrastructure adapters for Plumb.
//!
//! This crate implements the ports defined in `plumb-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod checkers;
pub mod filesystem;
pub mod manifests;

// Re-export commonly used adapters
pub use checkers::{EnvChecker, JsonChecker, TomlChecker, builtin_checkers};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifests::{
    CargoManifestParser, GoModParser, PackageJsonParser, RequirementsParser, builtin_parsers,
};

use std::sync::Arc;

use plumb_core::application::{Filesystem, ValidationEngine};

/// An engine wired with every built-in checker and manifest parser.
pub fn engine_with_builtins(fs: Arc<dyn Filesystem>) -> ValidationEngine {
    let engine = builtin_checkers()
        .into_iter()
        .fold(ValidationEngine::new(fs), ValidationEngine::with_checker);
    builtin_parsers()
        .into_iter()
        .fold(engine, ValidationEngine::with_parser)
}
