//! Rule-driven validation and remediation for generated projects.
//!
//! `domain` holds pure values (versions, rules, issues, fixes, the
//! compatibility matrix and advisory data). `application` runs them against a
//! project through the traits in `application::ports`; concrete filesystems,
//! syntax checkers and manifest parsers live in `plumb-adapters`.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            plumb-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (ValidationEngine, AutoFixExecutor)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Checker, Parser, Advisory) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     plumb-adapters (Infrastructure)     │
//! │  (LocalFilesystem, JsonChecker, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (Rules, Versions, CompatibilityMatrix)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plumb_core::application::{CancellationToken, ValidationEngine, ValidationRequest};
//! # fn run(filesystem: Arc<dyn plumb_core::application::Filesystem>) -> plumb_core::error::PlumbResult<()> {
//!
//! let engine = ValidationEngine::new(filesystem);
//! let result = engine.validate(&ValidationRequest::new("./my-project"), &CancellationToken::new())?;
//!
//! let fixer = engine.auto_fixer("./my-project").dry_run(true);
//! let preview = fixer.preview_fixes(".", &result.fixable_issues())?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// The types most callers need to run a validation and apply its fixes.
pub mod prelude {
    pub use crate::application::{
        AutoFixExecutor, CancellationToken, FixStrategyRegistry, RuleRegistry, ValidationEngine,
        ValidationRequest,
        ports::{Filesystem, ManifestParser, SyntaxChecker, VulnerabilitySource},
    };
    pub use crate::domain::{
        ComparisonMode, Ecosystem, Fix, FixAction, FixPreview, FixResult, ProjectConfig,
        Severity, ValidationIssue, ValidationResult, ValidationRule, VersionConfig,
        VersionsConfig,
    };
    pub use crate::error::{PlumbError, PlumbResult};
}
