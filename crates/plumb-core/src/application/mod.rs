//! Application layer for Plumb.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ValidationEngine, AutoFixExecutor)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Version grammars,
//! rule definitions and the compatibility matrix live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main services
pub use services::{
    AutoFixExecutor, CancellationToken, DependencyGraphValidator, FixStrategy,
    FixStrategyRegistry, GenerationGate, RuleRegistry, ValidationEngine, ValidationRequest,
    VersionCompatibilityValidator, VulnerabilityIndex,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, ManifestParser, SyntaxChecker, VulnerabilitySource};

pub use error::ApplicationError;
