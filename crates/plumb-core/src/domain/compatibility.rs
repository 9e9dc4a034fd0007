//! Version compatibility registry.
//!
//! # Design
//!
//! Each ecosystem is described exactly once by an [`EcosystemDef`] in
//! [`ECOSYSTEM_REGISTRY`]: its recommended version tuple, the runtime floor
//! the generation gate enforces, the image family its container slot must
//! reference, and the path indicators used to classify templates. Services
//! never match on ecosystems to get this data; they look it up here.
//!
//! The static table is the built-in default. Services receive an owned
//! [`CompatibilityMatrix`] at construction so tests can inject their own.
//!
//! # Adding a New Ecosystem
//!
//! 1. Add a variant to `Ecosystem` in `value_objects.rs`
//! 2. Add one [`EcosystemDef`] entry to [`ECOSYSTEM_REGISTRY`]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Ecosystem;

/// Minimum runtime version, compared on `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumVersion {
    pub major: u64,
    pub minor: u64,
}

impl MinimumVersion {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    pub const fn allows(&self, major: u64, minor: u64) -> bool {
        major > self.major || (major == self.major && minor >= self.minor)
    }
}

impl std::fmt::Display for MinimumVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Static description of one ecosystem's version expectations.
#[derive(Debug, Clone, Copy)]
pub struct EcosystemDef {
    pub ecosystem: Ecosystem,

    /// Recommended runtime range, e.g. `">=20.0.0"`.
    pub runtime: &'static str,

    /// Recommended type-definitions package version, if the ecosystem has one.
    pub types_package: Option<&'static str>,

    /// Recommended build tool range, if the ecosystem has one.
    pub build_tool: Option<&'static str>,

    /// Recommended container base image.
    pub image: &'static str,

    /// Substrings that must appear in the image name for this runtime.
    pub image_families: &'static [&'static str],

    /// Lowest runtime the generated projects support.
    pub minimum_runtime: MinimumVersion,

    /// Whether even majors are LTS releases (Node.js cadence).
    pub lts_cadence: bool,

    /// Path fragments that mark a template as targeting this ecosystem.
    pub template_indicators: &'static [&'static str],

    /// Whether runtime versions may omit the patch component (`1.22`).
    pub short_versions: bool,
}

/// Single source of truth for the built-in compatibility tuples.
pub static ECOSYSTEM_REGISTRY: &[EcosystemDef] = &[
    EcosystemDef {
        ecosystem: Ecosystem::Npm,
        runtime: ">=20.0.0",
        types_package: Some("^20.17.0"),
        build_tool: Some("^5.4.0"),
        image: "node:20-alpine",
        image_families: &["node"],
        minimum_runtime: MinimumVersion::new(18, 0),
        lts_cadence: true,
        template_indicators: &[
            "frontend/",
            "package.json",
            "tsconfig",
            "vite.config",
            "next.config",
            ".tsx",
            ".jsx",
            ".vue",
            ".svelte",
        ],
        short_versions: false,
    },
    EcosystemDef {
        ecosystem: Ecosystem::Go,
        runtime: "1.22.0",
        types_package: None,
        build_tool: None,
        image: "golang:1.22-alpine",
        image_families: &["golang", "go"],
        minimum_runtime: MinimumVersion::new(1, 21),
        lts_cadence: false,
        template_indicators: &["backend/", "go.mod", "go.sum", ".go", "cmd/", "internal/"],
        short_versions: true,
    },
];

pub fn find_ecosystem(ecosystem: Ecosystem) -> Option<&'static EcosystemDef> {
    ECOSYSTEM_REGISTRY.iter().find(|d| d.ecosystem == ecosystem)
}

/// Owned recommended tuple for one ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub runtime: String,
    pub types_package: Option<String>,
    pub build_tool: Option<String>,
    pub image: String,
    pub image_families: Vec<String>,
    pub minimum_runtime: MinimumVersion,
    pub lts_cadence: bool,
    pub template_indicators: Vec<String>,
    pub short_versions: bool,
}

impl From<&EcosystemDef> for CompatibilityEntry {
    fn from(def: &EcosystemDef) -> Self {
        Self {
            runtime: def.runtime.to_string(),
            types_package: def.types_package.map(str::to_string),
            build_tool: def.build_tool.map(str::to_string),
            image: def.image.to_string(),
            image_families: def.image_families.iter().map(|s| s.to_string()).collect(),
            minimum_runtime: def.minimum_runtime,
            lts_cadence: def.lts_cadence,
            template_indicators: def
                .template_indicators
                .iter()
                .map(|s| s.to_string())
                .collect(),
            short_versions: def.short_versions,
        }
    }
}

/// Immutable compatibility data injected into the validators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    entries: HashMap<Ecosystem, CompatibilityEntry>,
}

impl CompatibilityMatrix {
    /// Matrix built from [`ECOSYSTEM_REGISTRY`].
    pub fn builtin() -> Self {
        Self {
            entries: ECOSYSTEM_REGISTRY
                .iter()
                .map(|def| (def.ecosystem, CompatibilityEntry::from(def)))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, ecosystem: Ecosystem, entry: CompatibilityEntry) -> Self {
        self.entries.insert(ecosystem, entry);
        self
    }

    pub fn get(&self, ecosystem: Ecosystem) -> Option<&CompatibilityEntry> {
        self.entries.get(&ecosystem)
    }

    pub fn ecosystems(&self) -> impl Iterator<Item = Ecosystem> + '_ {
        self.entries.keys().copied()
    }

    /// Ecosystems whose indicators appear in `template_path`.
    ///
    /// Classification is not exclusive: a path can match several ecosystems.
    pub fn classify_template(&self, template_path: &str) -> Vec<Ecosystem> {
        let normalized = template_path.replace('\\', "/").to_ascii_lowercase();
        let mut matched: Vec<Ecosystem> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                entry
                    .template_indicators
                    .iter()
                    .any(|indicator| normalized.contains(indicator.as_str()))
            })
            .map(|(ecosystem, _)| *ecosystem)
            .collect();
        matched.sort();
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::version::{extract_major_version, is_valid_short_version_range};

    #[test]
    fn registry_is_internally_consistent() {
        for def in ECOSYSTEM_REGISTRY {
            assert!(
                is_valid_short_version_range(def.runtime),
                "{} runtime",
                def.ecosystem
            );
            let major = extract_major_version(def.runtime).unwrap();
            assert!(
                major >= def.minimum_runtime.major,
                "{} recommends a runtime below its own floor",
                def.ecosystem
            );
            assert!(
                def.image_families.iter().any(|f| def.image.contains(f)),
                "{} image does not match its family",
                def.ecosystem
            );
        }
    }

    #[test]
    fn recommended_node_tuple_is_compatible() {
        let node = find_ecosystem(Ecosystem::Npm).unwrap();
        let runtime = extract_major_version(node.runtime).unwrap();
        let types = extract_major_version(node.types_package.unwrap()).unwrap();
        assert!(types >= runtime && types <= runtime + 2);
    }

    #[test]
    fn minimum_version_compares_major_then_minor() {
        let min = MinimumVersion::new(1, 21);
        assert!(min.allows(1, 21));
        assert!(min.allows(1, 22));
        assert!(min.allows(2, 0));
        assert!(!min.allows(1, 20));
    }

    #[test]
    fn classification_can_overlap() {
        let matrix = CompatibilityMatrix::builtin();
        assert_eq!(
            matrix.classify_template("backend/cmd/server/main.go"),
            vec![Ecosystem::Go]
        );
        assert_eq!(
            matrix.classify_template("frontend/src/App.tsx"),
            vec![Ecosystem::Npm]
        );
        assert_eq!(
            matrix.classify_template("backend/package.json"),
            vec![Ecosystem::Npm, Ecosystem::Go]
        );
        assert!(matrix.classify_template("README.md").is_empty());
    }

    #[test]
    fn empty_matrix_classifies_nothing() {
        assert!(
            CompatibilityMatrix::empty()
                .classify_template("frontend/package.json")
                .is_empty()
        );
    }
}
