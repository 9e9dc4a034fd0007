//! Version configuration supplied to the generator and the validators.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Ecosystem, Severity, SuggestionPriority};

/// Error codes attached to version validation errors.
pub mod codes {
    pub const INVALID_VERSION_FORMAT: &str = "INVALID_VERSION_FORMAT";
    pub const INVALID_IMAGE_FORMAT: &str = "INVALID_IMAGE_FORMAT";
    pub const IMAGE_RUNTIME_MISMATCH: &str = "IMAGE_RUNTIME_MISMATCH";
    pub const VERSION_COMPATIBILITY_MISMATCH: &str = "VERSION_COMPATIBILITY_MISMATCH";
    pub const VERSION_PARSE_ERROR: &str = "VERSION_PARSE_ERROR";
}

/// Field of a [`VersionConfig`], used to label errors and suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionField {
    Runtime,
    TypesPackage,
    BuildTool,
    Image,
}

impl VersionField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::TypesPackage => "types_package",
            Self::BuildTool => "build_tool",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for VersionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ecosystem's version tuple.
///
/// For Node.js: runtime `">=20.0.0"`, types package (`@types/node`)
/// `"^20.17.0"`, build tool (Vite) `"^5.4.0"`, image `"node:20-alpine"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    pub ecosystem: Ecosystem,
    pub runtime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub is_lts: bool,
}

impl VersionConfig {
    pub fn new(ecosystem: Ecosystem, runtime: impl Into<String>) -> Self {
        Self {
            ecosystem,
            runtime: runtime.into(),
            types_package: None,
            build_tool: None,
            image: None,
            is_lts: false,
        }
    }

    pub fn types_package(mut self, version: impl Into<String>) -> Self {
        self.types_package = Some(version.into());
        self
    }

    pub fn build_tool(mut self, version: impl Into<String>) -> Self {
        self.build_tool = Some(version.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn lts(mut self, is_lts: bool) -> Self {
        self.is_lts = is_lts;
        self
    }

    pub fn field(&self, field: VersionField) -> Option<&str> {
        match field {
            VersionField::Runtime => Some(self.runtime.as_str()),
            VersionField::TypesPackage => self.types_package.as_deref(),
            VersionField::BuildTool => self.build_tool.as_deref(),
            VersionField::Image => self.image.as_deref(),
        }
    }
}

/// Version blocks per ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<VersionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go: Option<VersionConfig>,
}

impl VersionsConfig {
    pub fn get(&self, ecosystem: Ecosystem) -> Option<&VersionConfig> {
        match ecosystem {
            Ecosystem::Npm => self.node.as_ref(),
            Ecosystem::Go => self.go.as_ref(),
            Ecosystem::Cargo | Ecosystem::Pip => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionConfig> {
        self.node.iter().chain(self.go.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_none() && self.go.is_none()
    }
}

/// Configuration the generator hands to the pre-generation gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub versions: Option<VersionsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionValidationError {
    pub field: VersionField,
    pub value: String,
    pub message: String,
    pub code: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionWarning {
    pub field: VersionField,
    pub value: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSuggestion {
    pub ecosystem: Ecosystem,
    pub field: VersionField,
    pub current_value: String,
    pub suggested_value: String,
    pub reason: String,
    pub priority: SuggestionPriority,
    pub breaking_change: bool,
}

/// Outcome of validating one [`VersionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionValidationResult {
    pub ecosystem: Ecosystem,
    pub valid: bool,
    pub errors: Vec<VersionValidationError>,
    pub warnings: Vec<VersionWarning>,
    pub suggestions: Vec<VersionSuggestion>,
}

impl VersionValidationResult {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self {
            ecosystem,
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn push_error(&mut self, error: VersionValidationError) {
        if error.severity.is_error() {
            self.valid = false;
        }
        self.errors.push(error);
    }

    pub fn critical_errors(&self) -> impl Iterator<Item = &VersionValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == Severity::Critical)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}
