// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Plumb.
//!
//! Pure validation logic: value objects, rules, issues, fix descriptors,
//! version comparison and the compatibility registry. All I/O goes through
//! ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: Issues and fixes are Clone + PartialEq and never
//!   mutated after emission
//! - **Injected data**: Static tables are handed to services at construction
//!
// Public API - what the world sees
pub mod advisories;
pub mod compatibility;
pub mod entities;
pub mod error;
pub mod value_objects;
pub mod version;

// Re-exports for convenience
pub use compatibility::{CompatibilityEntry, CompatibilityMatrix, MinimumVersion};
pub use entities::*;
pub use error::{DomainError, ErrorCategory};
pub use value_objects::{
    AdvisorySeverity, ComparisonMode, DependencyClass, Ecosystem, FixAction, RuleCategory,
    Severity, SuggestionPriority, UpdateType,
};
