pub mod common;
pub mod dependency;
pub mod fix;
pub mod issue;
pub mod rule;
pub mod version_config;

pub use crate::domain::DomainError;
pub use common::ProjectRoot;
pub use dependency::{
    DependencyConflict, DependencyError, DependencyRecord, DependencySummary,
    DependencyValidationResult, DependencyVulnerability, OutdatedDependency, VulnerabilityRecord,
};
pub use fix::{AppliedFix, FailedFix, FileChange, Fix, FixPreview, FixResult, SkippedFix};
pub use issue::{
    ConfigSummary, ConfigValidationResult, ValidationIssue, ValidationResult, ValidationSummary,
};
pub use rule::{ValidationRule, default_rules};
pub use version_config::{
    ProjectConfig, VersionConfig, VersionField, VersionSuggestion, VersionValidationError,
    VersionValidationResult, VersionWarning, VersionsConfig,
};
