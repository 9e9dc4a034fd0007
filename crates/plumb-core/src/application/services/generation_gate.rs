//! Pre-generation gate.
//!
//! Rejects rendering a template outright when the project configuration
//! cannot support it. Unlike validation, the gate returns the first
//! blocking problem as an error.

use tracing::{debug, instrument};

use crate::domain::version::{SemVer, extract_major_version};
use crate::domain::{CompatibilityMatrix, DomainError, ProjectConfig};

#[derive(Debug, Clone)]
pub struct GenerationGate {
    matrix: CompatibilityMatrix,
}

impl Default for GenerationGate {
    fn default() -> Self {
        Self::new(CompatibilityMatrix::builtin())
    }
}

impl GenerationGate {
    pub fn new(matrix: CompatibilityMatrix) -> Self {
        Self { matrix }
    }

    /// Check whether `template_path` may be generated with `config`.
    ///
    /// Checks run in order: configuration present, versions present, every
    /// ecosystem the template belongs to has a version block, and each of
    /// those blocks meets its ecosystem's minimum runtime.
    #[instrument(skip(self, config))]
    pub fn check(
        &self,
        config: Option<&ProjectConfig>,
        template_path: &str,
    ) -> Result<(), DomainError> {
        let config = config.ok_or(DomainError::MissingConfiguration { field: "config" })?;
        let versions = config
            .versions
            .as_ref()
            .ok_or(DomainError::MissingConfiguration { field: "versions" })?;

        let ecosystems = self.matrix.classify_template(template_path);
        debug!(?ecosystems, "Template classified");

        for ecosystem in ecosystems {
            let block = versions.get(ecosystem).ok_or_else(|| {
                DomainError::MissingEcosystemVersions {
                    ecosystem: ecosystem.to_string(),
                    template: template_path.to_string(),
                }
            })?;

            let Some(entry) = self.matrix.get(ecosystem) else {
                continue;
            };
            let minimum = entry.minimum_runtime;
            let (major, minor) = match SemVer::parse(&block.runtime) {
                Ok(v) => (v.major, v.minor),
                Err(_) => (extract_major_version(&block.runtime)?, 0),
            };
            if !minimum.allows(major, minor) {
                return Err(DomainError::VersionBelowMinimum {
                    ecosystem: ecosystem.to_string(),
                    found: block.runtime.clone(),
                    minimum: minimum.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ecosystem, VersionConfig, VersionsConfig};

    fn config(node: Option<&str>, go: Option<&str>) -> ProjectConfig {
        ProjectConfig {
            name: "demo".into(),
            versions: Some(VersionsConfig {
                node: node.map(|v| VersionConfig::new(Ecosystem::Npm, v)),
                go: go.map(|v| VersionConfig::new(Ecosystem::Go, v)),
            }),
        }
    }

    #[test]
    fn missing_config_short_circuits() {
        let gate = GenerationGate::default();
        assert_eq!(
            gate.check(None, "backend/go.mod"),
            Err(DomainError::MissingConfiguration { field: "config" })
        );
    }

    #[test]
    fn missing_versions_is_reported_second() {
        let gate = GenerationGate::default();
        let cfg = ProjectConfig {
            name: "demo".into(),
            versions: None,
        };
        assert_eq!(
            gate.check(Some(&cfg), "README.md"),
            Err(DomainError::MissingConfiguration { field: "versions" })
        );
    }

    #[test]
    fn backend_template_needs_go_block() {
        let gate = GenerationGate::default();
        let err = gate
            .check(Some(&config(Some(">=20.0.0"), None)), "backend/go.mod")
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingEcosystemVersions { ref ecosystem, .. } if ecosystem == "go"
        ));
    }

    #[test]
    fn overlapping_template_checks_both_ecosystems() {
        let gate = GenerationGate::default();
        let path = "backend/package.json";
        assert!(gate.check(Some(&config(Some(">=20.0.0"), None)), path).is_err());
        assert!(gate.check(Some(&config(None, Some("1.22"))), path).is_err());
        assert!(
            gate.check(Some(&config(Some(">=20.0.0"), Some("1.22"))), path)
                .is_ok()
        );
    }

    #[test]
    fn floors_are_enforced_per_ecosystem() {
        let gate = GenerationGate::default();
        assert!(matches!(
            gate.check(Some(&config(Some(">=16.0.0"), None)), "frontend/src/App.tsx"),
            Err(DomainError::VersionBelowMinimum { .. })
        ));
        assert!(matches!(
            gate.check(Some(&config(None, Some("1.20"))), "backend/main.go"),
            Err(DomainError::VersionBelowMinimum { .. })
        ));
        assert!(gate.check(Some(&config(None, Some("1.21.0"))), "backend/main.go").is_ok());
        assert!(gate.check(Some(&config(Some("^18.0.0"), None)), "frontend/index.jsx").is_ok());
    }

    #[test]
    fn unclassified_template_only_needs_versions() {
        let gate = GenerationGate::default();
        assert!(gate.check(Some(&config(None, None)), "docs/README.md").is_ok());
    }

    #[test]
    fn unparseable_runtime_is_a_version_error() {
        let gate = GenerationGate::default();
        assert!(matches!(
            gate.check(Some(&config(Some("latest"), None)), "frontend/app.vue"),
            Err(DomainError::VersionParse { .. })
        ));
    }
}
