//! Validation rules and the built-in rule set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{RuleCategory, Severity};

/// Identifiers of the rules the engine knows how to evaluate.
pub mod ids {
    pub const README_REQUIRED: &str = "readme-required";
    pub const LICENSE_REQUIRED: &str = "license-required";
    pub const GITIGNORE_RECOMMENDED: &str = "gitignore-recommended";
    pub const MANIFEST_SYNTAX_VALID: &str = "manifest-syntax-valid";
    pub const SECRET_DETECTION: &str = "secret-detection";
    pub const NAMING_CONVENTIONS: &str = "naming-conventions";
    pub const TEMPLATE_EXTENSION: &str = "template-extension";
    pub const FILE_PERMISSIONS: &str = "file-permissions";
    pub const DEPENDENCY_CONFLICTS: &str = "dependency-conflicts";
    pub const DEPENDENCY_VULNERABILITIES: &str = "dependency-vulnerabilities";
    pub const VERSION_COMPATIBILITY: &str = "version-compatibility";
}

/// A validation rule as held by the rule registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub enabled: bool,
    pub fixable: bool,
    /// File extensions or names the rule inspects; empty means every file.
    pub applicable_file_types: BTreeSet<String>,
}

impl ValidationRule {
    /// Enabled, non-fixable rule with no file-type restriction.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: RuleCategory,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            severity,
            enabled: true,
            fixable: false,
            applicable_file_types: BTreeSet::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn fixable(mut self, fixable: bool) -> Self {
        self.fixable = fixable;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn file_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_file_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the rule applies to a file with this name.
    pub fn applies_to(&self, file_name: &str) -> bool {
        if self.applicable_file_types.is_empty() {
            return true;
        }
        let lower = file_name.to_ascii_lowercase();
        self.applicable_file_types
            .iter()
            .any(|t| lower == *t || lower.ends_with(&format!(".{t}")))
    }
}

/// The rule set every registry starts with.
pub fn default_rules() -> Vec<ValidationRule> {
    use RuleCategory::*;
    use Severity::*;

    vec![
        ValidationRule::new(ids::README_REQUIRED, "README required", Structure, Warning)
            .description("Projects must ship a README at the root")
            .fixable(true),
        ValidationRule::new(ids::LICENSE_REQUIRED, "LICENSE required", Structure, Warning)
            .description("Projects must ship a LICENSE at the root")
            .fixable(true),
        ValidationRule::new(ids::GITIGNORE_RECOMMENDED, ".gitignore recommended", Structure, Info)
            .description("A .gitignore keeps build output out of version control")
            .fixable(true),
        ValidationRule::new(
            ids::MANIFEST_SYNTAX_VALID,
            "Manifest syntax valid",
            Config,
            Error,
        )
        .description("Configuration and manifest files must parse"),
        ValidationRule::new(ids::SECRET_DETECTION, "Secret detection", Security, Error)
            .description("Credentials must not be committed"),
        ValidationRule::new(ids::NAMING_CONVENTIONS, "Naming conventions", Quality, Warning)
            .description("File names must not contain spaces")
            .fixable(true),
        ValidationRule::new(ids::TEMPLATE_EXTENSION, "Template extension", Quality, Info)
            .description("Files with template placeholders should use the .tmpl extension")
            .fixable(true),
        ValidationRule::new(ids::FILE_PERMISSIONS, "Key file permissions", Security, Warning)
            .description("Private key material should be readable by its owner only")
            .fixable(true)
            .file_types(["pem", "key"]),
        ValidationRule::new(
            ids::DEPENDENCY_CONFLICTS,
            "Dependency conflicts",
            Dependencies,
            Warning,
        )
        .description("The same dependency must not be declared with different versions"),
        ValidationRule::new(
            ids::DEPENDENCY_VULNERABILITIES,
            "Known vulnerabilities",
            Dependencies,
            Warning,
        )
        .description("Dependencies must not resolve to versions with known advisories"),
        ValidationRule::new(
            ids::VERSION_COMPATIBILITY,
            "Version compatibility",
            Config,
            Error,
        )
        .description("Runtime, types package, build tool and image versions must agree"),
    ]
}
