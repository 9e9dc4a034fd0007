//! Integration tests for plumb-core's public API.

use std::sync::Arc;

use plumb_core::application::services::prioritize_security_updates;
use plumb_core::application::{
    DependencyGraphValidator, GenerationGate, RuleRegistry, VersionCompatibilityValidator,
    VulnerabilityIndex,
};
use plumb_core::domain::version_config::codes;
use plumb_core::domain::{
    DependencyClass, DependencyRecord, DomainError, Ecosystem, ProjectConfig, RuleCategory,
    Severity, VersionConfig, VersionsConfig,
};

fn npm(name: &str, version: &str, source: &str) -> DependencyRecord {
    DependencyRecord::new(name, version, Ecosystem::Npm, DependencyClass::Production).source(source)
}

#[test]
fn default_rules_cover_every_category() {
    let registry = RuleRegistry::with_defaults();
    assert!(!registry.is_empty());
    for category in [
        RuleCategory::Structure,
        RuleCategory::Config,
        RuleCategory::Security,
        RuleCategory::Quality,
        RuleCategory::Dependencies,
    ] {
        assert!(
            !registry.rules_by_category(category).is_empty(),
            "no rules for {category:?}"
        );
    }
}

#[test]
fn mismatched_types_package_is_critical() {
    let validator = VersionCompatibilityValidator::default();
    let result = validator.validate(
        &VersionConfig::new(Ecosystem::Npm, ">=20.0.0").types_package("^16.0.0"),
    );

    assert!(!result.valid);
    assert!(result.has_code(codes::VERSION_COMPATIBILITY_MISMATCH));
    assert!(result.errors.iter().any(|e| e.severity == Severity::Critical));
}

#[test]
fn aligned_configuration_passes() {
    let validator = VersionCompatibilityValidator::default();
    let result = validator.validate(
        &VersionConfig::new(Ecosystem::Npm, ">=20.0.0")
            .types_package("^20.0.0")
            .image("node:20-alpine"),
    );
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn gate_rejects_templates_without_versions() {
    let gate = GenerationGate::default();
    let config = ProjectConfig {
        name: "demo".into(),
        versions: Some(VersionsConfig {
            node: Some(VersionConfig::new(Ecosystem::Npm, ">=20.0.0")),
            go: None,
        }),
    };

    assert!(gate.check(Some(&config), "frontend/package.json").is_ok());
    assert!(matches!(
        gate.check(Some(&config), "backend/go.mod"),
        Err(DomainError::MissingEcosystemVersions { .. })
    ));
}

#[test]
fn dependency_graph_reports_conflicts_and_advisories() {
    let validator = DependencyGraphValidator::new(Arc::new(VulnerabilityIndex::builtin()));
    let result = validator.validate(vec![
        npm("lodash", "4.17.15", "package.json"),
        npm("lodash", "4.17.21", "web/package.json"),
        npm("react", "18.3.1", "package.json"),
    ]);

    assert!(result.valid);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.vulnerabilities.len(), 1);
    assert_eq!(result.summary.total, 3);

    let prioritized = prioritize_security_updates(&result.vulnerabilities);
    assert_eq!(prioritized[0].dependency, "lodash");
}
