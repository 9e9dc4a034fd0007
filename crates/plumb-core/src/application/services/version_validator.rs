//! Version compatibility validation for one ecosystem's version tuple.
//!
//! Every pass runs regardless of earlier failures so a single call reports
//! every problem:
//!
//! 1. format of each version field
//! 2. image reference shape and runtime family
//! 3. runtime / types-package major band (critical)
//! 4. LTS cadence (warning + suggestion)
//! 5. drift from the compatibility matrix (suggestions)

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::version::{
    extract_major_version, is_breaking, is_lts_major, is_valid_short_version_range,
    is_valid_version_range, nearest_lts_major,
};
use crate::domain::version_config::codes;
use crate::domain::{
    CompatibilityEntry, CompatibilityMatrix, Severity, SuggestionPriority, VersionConfig,
    VersionField, VersionSuggestion, VersionValidationError, VersionValidationResult,
    VersionWarning, VersionsConfig,
};

static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9]+(?:[._-][a-z0-9]+)*(?::[0-9]+)?/)*[a-z0-9]+(?:[._-][a-z0-9]+)*:[A-Za-z0-9_][A-Za-z0-9._-]*$")
        .expect("image reference pattern is valid")
});

/// How many majors the types package may run ahead of the runtime.
const TYPES_MAJOR_LEAD: u64 = 2;

#[derive(Debug, Clone)]
pub struct VersionCompatibilityValidator {
    matrix: CompatibilityMatrix,
}

impl Default for VersionCompatibilityValidator {
    fn default() -> Self {
        Self::new(CompatibilityMatrix::builtin())
    }
}

impl VersionCompatibilityValidator {
    pub fn new(matrix: CompatibilityMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    /// Validate every configured ecosystem.
    pub fn validate_all(&self, versions: &VersionsConfig) -> Vec<VersionValidationResult> {
        versions.iter().map(|config| self.validate(config)).collect()
    }

    #[instrument(skip_all, fields(ecosystem = %config.ecosystem))]
    pub fn validate(&self, config: &VersionConfig) -> VersionValidationResult {
        let mut result = VersionValidationResult::new(config.ecosystem);
        let entry = self.matrix.get(config.ecosystem);

        self.check_formats(config, entry, &mut result);
        self.check_image(config, entry, &mut result);
        self.check_types_band(config, &mut result);
        if let Some(entry) = entry {
            self.check_lts(config, entry, &mut result);
            self.check_drift(config, entry, &mut result);
        }

        debug!(
            valid = result.valid,
            errors = result.errors.len(),
            suggestions = result.suggestions.len(),
            "Version validation finished"
        );
        result
    }

    fn check_formats(
        &self,
        config: &VersionConfig,
        entry: Option<&CompatibilityEntry>,
        result: &mut VersionValidationResult,
    ) {
        let short_runtime = entry.is_some_and(|e| e.short_versions);
        let runtime_ok = if short_runtime {
            is_valid_short_version_range(&config.runtime)
        } else {
            is_valid_version_range(&config.runtime)
        };
        if !runtime_ok {
            result.push_error(format_error(VersionField::Runtime, &config.runtime));
        }

        for field in [VersionField::TypesPackage, VersionField::BuildTool] {
            if let Some(value) = config.field(field) {
                if !is_valid_version_range(value) {
                    result.push_error(format_error(field, value));
                }
            }
        }
    }

    fn check_image(
        &self,
        config: &VersionConfig,
        entry: Option<&CompatibilityEntry>,
        result: &mut VersionValidationResult,
    ) {
        let Some(image) = config.image.as_deref() else {
            return;
        };

        if !IMAGE_REFERENCE.is_match(image) {
            result.push_error(VersionValidationError {
                field: VersionField::Image,
                value: image.to_string(),
                message: format!("'{image}' is not a [registry/]name:tag image reference"),
                code: codes::INVALID_IMAGE_FORMAT.into(),
                severity: Severity::Error,
            });
            return;
        }

        let (path, tag) = image.rsplit_once(':').unwrap_or((image, ""));
        let name = path.rsplit('/').next().unwrap_or(path);

        if let Some(entry) = entry {
            let matches_family = entry
                .image_families
                .iter()
                .any(|family| name.contains(family.as_str()));
            if !matches_family {
                result.push_error(VersionValidationError {
                    field: VersionField::Image,
                    value: image.to_string(),
                    message: format!(
                        "image '{image}' does not reference the {} runtime (expected one of: {})",
                        config.ecosystem,
                        entry.image_families.join(", ")
                    ),
                    code: codes::IMAGE_RUNTIME_MISMATCH.into(),
                    severity: Severity::Error,
                });
            }
        }

        if tag == "latest" {
            result.warnings.push(VersionWarning {
                field: VersionField::Image,
                value: image.to_string(),
                message: "the 'latest' tag is not reproducible; pin a version".into(),
            });
        }
    }

    fn check_types_band(&self, config: &VersionConfig, result: &mut VersionValidationResult) {
        let Some(types) = config.types_package.as_deref() else {
            return;
        };
        // Unparseable fields were already reported by the format pass.
        let (Ok(runtime_major), Ok(types_major)) = (
            extract_major_version(&config.runtime),
            extract_major_version(types),
        ) else {
            return;
        };

        if types_major < runtime_major || types_major > runtime_major + TYPES_MAJOR_LEAD {
            result.push_error(VersionValidationError {
                field: VersionField::TypesPackage,
                value: types.to_string(),
                message: format!(
                    "types package major {types_major} is incompatible with runtime major \
                     {runtime_major} (expected {runtime_major}..={})",
                    runtime_major + TYPES_MAJOR_LEAD
                ),
                code: codes::VERSION_COMPATIBILITY_MISMATCH.into(),
                severity: Severity::Critical,
            });
        }
    }

    fn check_lts(
        &self,
        config: &VersionConfig,
        entry: &CompatibilityEntry,
        result: &mut VersionValidationResult,
    ) {
        if !entry.lts_cadence {
            return;
        }
        let Ok(major) = extract_major_version(&config.runtime) else {
            return;
        };
        if is_lts_major(major) {
            return;
        }

        let suggested = nearest_lts_major(major, entry.minimum_runtime.major);
        result.warnings.push(VersionWarning {
            field: VersionField::Runtime,
            value: config.runtime.clone(),
            message: format!("{} {major} is not an LTS release", config.ecosystem),
        });
        if config.is_lts {
            result.warnings.push(VersionWarning {
                field: VersionField::Runtime,
                value: config.runtime.clone(),
                message: format!("configuration is flagged LTS but major {major} is odd"),
            });
        }
        result.suggestions.push(VersionSuggestion {
            ecosystem: config.ecosystem,
            field: VersionField::Runtime,
            current_value: config.runtime.clone(),
            suggested_value: format!(">={suggested}.0.0"),
            reason: format!("{suggested} is the nearest LTS major"),
            priority: SuggestionPriority::Medium,
            breaking_change: suggested != major,
        });
    }

    fn check_drift(
        &self,
        config: &VersionConfig,
        entry: &CompatibilityEntry,
        result: &mut VersionValidationResult,
    ) {
        let recommended = [
            (
                VersionField::TypesPackage,
                entry.types_package.as_deref(),
                SuggestionPriority::High,
            ),
            (
                VersionField::Runtime,
                Some(entry.runtime.as_str()),
                SuggestionPriority::Medium,
            ),
            (
                VersionField::BuildTool,
                entry.build_tool.as_deref(),
                SuggestionPriority::Medium,
            ),
            (
                VersionField::Image,
                Some(entry.image.as_str()),
                SuggestionPriority::Low,
            ),
        ];

        for (field, recommended, priority) in recommended {
            let (Some(current), Some(recommended)) = (config.field(field), recommended) else {
                continue;
            };
            if current == recommended {
                continue;
            }
            let breaking_change = match field {
                VersionField::Image => false,
                _ => is_breaking(current, recommended),
            };
            result.suggestions.push(VersionSuggestion {
                ecosystem: config.ecosystem,
                field,
                current_value: current.to_string(),
                suggested_value: recommended.to_string(),
                reason: format!("recommended {field} for {} is {recommended}", config.ecosystem),
                priority,
                breaking_change,
            });
        }
    }
}

fn format_error(field: VersionField, value: &str) -> VersionValidationError {
    VersionValidationError {
        field,
        value: value.to_string(),
        message: format!("'{value}' is not a valid {field} version"),
        code: codes::INVALID_VERSION_FORMAT.into(),
        severity: Severity::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ecosystem;

    fn node(runtime: &str, types: &str) -> VersionConfig {
        VersionConfig::new(Ecosystem::Npm, runtime).types_package(types)
    }

    fn validator() -> VersionCompatibilityValidator {
        VersionCompatibilityValidator::default()
    }

    #[test]
    fn aligned_majors_are_valid() {
        let result = validator().validate(&node(">=20.0.0", "^20.17.0"));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn older_types_major_is_critical() {
        let result = validator().validate(&node(">=20.0.0", "^16.0.0"));
        assert!(!result.valid);
        let critical: Vec<_> = result.critical_errors().collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].code, codes::VERSION_COMPATIBILITY_MISMATCH);
    }

    #[test]
    fn band_is_inclusive_of_two_majors_ahead() {
        let v = validator();
        for (types, critical) in [
            ("^19.0.0", true),
            ("^20.0.0", false),
            ("^21.0.0", false),
            ("^22.1.0", false),
            ("^23.0.0", true),
        ] {
            let result = v.validate(&node(">=20.0.0", types));
            assert_eq!(
                result.critical_errors().count(),
                usize::from(critical),
                "types {types}"
            );
        }
    }

    #[test]
    fn all_passes_run_after_format_error() {
        let config = node("twenty", "^16.0.0").image("ubuntu:22.04");
        let result = validator().validate(&config);
        assert!(result.has_code(codes::INVALID_VERSION_FORMAT));
        assert!(result.has_code(codes::IMAGE_RUNTIME_MISMATCH));
        assert!(!result.valid);
    }

    #[test]
    fn malformed_image_reference() {
        let result = validator().validate(&node(">=20.0.0", "^20.0.0").image("node"));
        assert!(result.has_code(codes::INVALID_IMAGE_FORMAT));
        assert!(!result.has_code(codes::IMAGE_RUNTIME_MISMATCH));
    }

    #[test]
    fn registry_prefixed_images_are_accepted() {
        let config = node(">=20.0.0", "^20.0.0").image("docker.io/library/node:20-alpine");
        let result = validator().validate(&config);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn odd_major_suggests_previous_lts() {
        let config = node(">=21.0.0", "^21.0.0");
        let result = validator().validate(&config);
        assert!(result.valid);
        let lts = result
            .suggestions
            .iter()
            .find(|s| s.reason.contains("LTS"))
            .unwrap();
        assert_eq!(lts.suggested_value, ">=20.0.0");
        assert!(lts.breaking_change);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn lts_suggestion_is_floored_at_minimum() {
        let matrix = CompatibilityMatrix::builtin();
        let mut entry = matrix.get(Ecosystem::Npm).unwrap().clone();
        entry.minimum_runtime = crate::domain::MinimumVersion::new(19, 0);
        let v = VersionCompatibilityValidator::new(matrix.with_entry(Ecosystem::Npm, entry));

        let result = v.validate(&VersionConfig::new(Ecosystem::Npm, ">=19.0.0"));
        let lts = &result.suggestions[0];
        assert_eq!(lts.suggested_value, ">=19.0.0");
        assert!(!lts.breaking_change);
    }

    #[test]
    fn lts_flag_on_odd_major_warns_twice() {
        let config = VersionConfig::new(Ecosystem::Npm, ">=21.0.0").lts(true);
        let result = validator().validate(&config);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn drift_priorities_follow_field() {
        let config = VersionConfig::new(Ecosystem::Npm, ">=22.0.0")
            .types_package("^22.0.0")
            .image("node:22-alpine");
        let result = validator().validate(&config);
        let priority = |field| {
            result
                .suggestions
                .iter()
                .find(|s| s.field == field)
                .map(|s| s.priority)
        };
        assert_eq!(priority(VersionField::TypesPackage), Some(SuggestionPriority::High));
        assert_eq!(priority(VersionField::Runtime), Some(SuggestionPriority::Medium));
        assert_eq!(priority(VersionField::Image), Some(SuggestionPriority::Low));
        assert!(result.valid);
    }

    #[test]
    fn go_accepts_short_runtime() {
        let config = VersionConfig::new(Ecosystem::Go, "1.22").image("golang:1.22-alpine");
        let result = validator().validate(&config);
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn latest_tag_warns() {
        let config = VersionConfig::new(Ecosystem::Go, "1.22.0").image("golang:latest");
        let result = validator().validate(&config);
        assert!(result.valid);
        assert!(result.warnings.iter().any(|w| w.message.contains("latest")));
    }
}
