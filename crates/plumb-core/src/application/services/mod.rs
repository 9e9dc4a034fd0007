//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "validate a project" or "apply fixes".

pub mod auto_fix;
pub mod dependency_validator;
pub mod engine;
pub mod fix_strategies;
pub mod generation_gate;
pub mod rule_registry;
pub mod version_validator;
pub mod vulnerability;

pub use auto_fix::{AutoFixExecutor, BACKUP_SUFFIX};
pub use dependency_validator::DependencyGraphValidator;
pub use engine::{CancellationToken, DEFAULT_SKIP_DIRS, ValidationEngine, ValidationRequest};
pub use fix_strategies::{Fallback, FixStrategy, FixStrategyRegistry};
pub use generation_gate::GenerationGate;
pub use rule_registry::RuleRegistry;
pub use version_validator::VersionCompatibilityValidator;
pub use vulnerability::{
    CACHE_TTL_HOURS, CachedVulnerabilitySource, VulnerabilityIndex, prioritize_security_updates,
};
