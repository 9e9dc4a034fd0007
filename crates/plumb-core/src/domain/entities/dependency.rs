//! Dependency records and the result of validating a dependency graph.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    AdvisorySeverity, DependencyClass, Ecosystem, Severity, UpdateType,
};

/// One declared dependency, as parsed from a manifest.
///
/// The same name may appear in several records (different classes or
/// different manifests). Differing `declared_version`s for one name are a
/// conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,
    pub declared_version: String,
    pub ecosystem: Ecosystem,
    pub class: DependencyClass,
    pub source: PathBuf,
    pub resolved_valid: bool,
    pub known_vulnerability_count: usize,
}

impl DependencyRecord {
    pub fn new(
        name: impl Into<String>,
        declared_version: impl Into<String>,
        ecosystem: Ecosystem,
        class: DependencyClass,
    ) -> Self {
        Self {
            name: name.into(),
            declared_version: declared_version.into(),
            ecosystem,
            class,
            source: PathBuf::new(),
            resolved_valid: true,
            known_vulnerability_count: 0,
        }
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }

    /// `name@version` for messages.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.declared_version)
    }
}

/// Static advisory data for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    pub package: String,
    pub affected_range: String,
    pub advisory_id: String,
    pub severity: AdvisorySeverity,
    pub description: String,
    /// First release carrying the fix; `None` means every version is affected.
    pub fixed_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConflict {
    pub name: String,
    pub first: String,
    pub first_source: PathBuf,
    pub second: String,
    pub second_source: PathBuf,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyVulnerability {
    pub dependency: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    pub advisory: VulnerabilityRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedDependency {
    pub name: String,
    pub current: String,
    pub latest: String,
    pub update_type: UpdateType,
    pub breaking: bool,
}

/// A record that failed name or version format validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyError {
    pub dependency: String,
    pub source: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySummary {
    pub total: usize,
    pub production: usize,
    pub development: usize,
    pub peer: usize,
    pub indirect: usize,
    pub conflicts: usize,
    pub vulnerabilities: usize,
    pub outdated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyValidationResult {
    pub valid: bool,
    pub dependencies: Vec<DependencyRecord>,
    pub errors: Vec<DependencyError>,
    /// Human-readable warnings, e.g. failed advisory lookups.
    pub warnings: Vec<String>,
    pub conflicts: Vec<DependencyConflict>,
    pub vulnerabilities: Vec<DependencyVulnerability>,
    pub outdated: Vec<OutdatedDependency>,
    pub summary: DependencySummary,
}

impl Default for DependencyValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            dependencies: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            conflicts: Vec::new(),
            vulnerabilities: Vec::new(),
            outdated: Vec::new(),
            summary: DependencySummary::default(),
        }
    }
}

impl DependencyValidationResult {
    /// Record a format error. Format errors invalidate the result;
    /// vulnerabilities and conflicts do not.
    pub fn push_error(&mut self, error: DependencyError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Recompute summary counters from the collected lists.
    pub fn refresh_summary(&mut self) {
        let mut summary = DependencySummary {
            total: self.dependencies.len(),
            conflicts: self.conflicts.len(),
            vulnerabilities: self.vulnerabilities.len(),
            outdated: self.outdated.len(),
            ..DependencySummary::default()
        };
        for dep in &self.dependencies {
            match dep.class {
                DependencyClass::Production => summary.production += 1,
                DependencyClass::Development => summary.development += 1,
                DependencyClass::Peer => summary.peer += 1,
                DependencyClass::Indirect => summary.indirect += 1,
            }
        }
        self.summary = summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_classes() {
        let mut result = DependencyValidationResult {
            dependencies: vec![
                DependencyRecord::new("a", "1.0.0", Ecosystem::Npm, DependencyClass::Production),
                DependencyRecord::new("b", "1.0.0", Ecosystem::Npm, DependencyClass::Development),
                DependencyRecord::new("c", "v1.0.0", Ecosystem::Go, DependencyClass::Indirect),
            ],
            ..Default::default()
        };
        result.refresh_summary();
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.production, 1);
        assert_eq!(result.summary.development, 1);
        assert_eq!(result.summary.indirect, 1);
        assert!(result.valid);
    }

    #[test]
    fn format_errors_invalidate() {
        let mut result = DependencyValidationResult::default();
        result.push_error(DependencyError {
            dependency: "Bad Name".into(),
            source: PathBuf::from("package.json"),
            message: "invalid npm package name".into(),
        });
        assert!(!result.valid);
    }
}
