//! Dependency graph validation: manifest discovery, name/version grammars,
//! conflicts, known vulnerabilities and outdated packages.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::application::ports::{Filesystem, ManifestParser, VulnerabilitySource};
use crate::domain::advisories::{LatestVersionTable, builtin_latest_versions};
use crate::domain::version::{clean_version, compare_versions, is_breaking, is_older_than, update_type};
use crate::domain::{
    ComparisonMode, DependencyConflict, DependencyError, DependencyRecord,
    DependencyValidationResult, DependencyVulnerability, Ecosystem, OutdatedDependency,
    ProjectRoot, Severity, VulnerabilityRecord,
};

static NPM_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@[a-z0-9~-][a-z0-9._~-]*/)?[a-z0-9~-][a-z0-9._~-]*$")
        .expect("npm name pattern is valid")
});

static GO_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~/+-]*$").expect("go module pattern is valid")
});

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?$").expect("package name pattern is valid")
});

static RANGE_COMPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[~^]|[<>]=?|=)?\s*v?(?:\d+|[xX*])(?:\.(?:\d+|[xX*]))?(?:\.(?:\d+|[xX*]))?(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?$",
    )
    .expect("range comparator pattern is valid")
});

static GO_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+incompatible)?$")
        .expect("go version pattern is valid")
});

static PIP_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:===|==|!=|<=|>=|~=|<|>)\s*\d+(?:\.(?:\d+|\*))*[A-Za-z0-9.+-]*$")
        .expect("pip specifier pattern is valid")
});

/// npm package names are capped at 214 characters.
const NPM_NAME_MAX: usize = 214;

/// Whether `name` is a well-formed package name for `ecosystem`.
pub fn is_valid_dependency_name(ecosystem: Ecosystem, name: &str) -> bool {
    match ecosystem {
        Ecosystem::Npm => name.len() <= NPM_NAME_MAX && NPM_NAME.is_match(name),
        Ecosystem::Go => GO_MODULE.is_match(name),
        Ecosystem::Cargo | Ecosystem::Pip => PACKAGE_NAME.is_match(name),
    }
}

/// Whether `version` is a well-formed declared constraint for `ecosystem`.
pub fn is_valid_dependency_version(ecosystem: Ecosystem, version: &str) -> bool {
    let version = version.trim();
    if version.is_empty() {
        return false;
    }
    match ecosystem {
        Ecosystem::Npm => {
            const NON_REGISTRY: [&str; 7] =
                ["file:", "link:", "workspace:", "npm:", "git", "http:", "https:"];
            if version == "latest" || NON_REGISTRY.iter().any(|p| version.starts_with(p)) {
                return true;
            }
            version.split("||").all(|set| {
                let set = set.trim();
                !set.is_empty()
                    && set
                        .split_whitespace()
                        .all(|token| token == "-" || RANGE_COMPARATOR.is_match(token))
            })
        }
        Ecosystem::Go => GO_VERSION.is_match(version),
        Ecosystem::Cargo => version
            .split(',')
            .all(|part| RANGE_COMPARATOR.is_match(part.trim())),
        Ecosystem::Pip => {
            version == "*"
                || version
                    .split(',')
                    .all(|part| PIP_SPECIFIER.is_match(part.trim()))
        }
    }
}

/// Validates the dependencies declared across a project's manifests.
pub struct DependencyGraphValidator {
    parsers: Vec<Arc<dyn ManifestParser>>,
    source: Arc<dyn VulnerabilitySource>,
    latest: LatestVersionTable,
    mode: ComparisonMode,
}

impl DependencyGraphValidator {
    pub fn new(source: Arc<dyn VulnerabilitySource>) -> Self {
        Self {
            parsers: Vec::new(),
            source,
            latest: builtin_latest_versions(),
            mode: ComparisonMode::default(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn ManifestParser>) -> Self {
        self.parsers.push(parser);
        self
    }

    pub fn with_latest_versions(mut self, latest: LatestVersionTable) -> Self {
        self.latest = latest;
        self
    }

    pub fn with_comparison_mode(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_source(&mut self, source: Arc<dyn VulnerabilitySource>) {
        self.source = source;
    }

    pub fn add_parser(&mut self, parser: Arc<dyn ManifestParser>) {
        self.parsers.push(parser);
    }

    pub fn set_comparison_mode(&mut self, mode: ComparisonMode) {
        self.mode = mode;
    }

    pub fn is_manifest(&self, path: &Path) -> bool {
        self.parsers.iter().any(|p| p.matches(path))
    }

    /// Parse every manifest among `files` and validate the combined set.
    ///
    /// `files` are absolute paths under `root`. A manifest that cannot be
    /// read or parsed becomes a warning.
    #[instrument(skip_all, fields(root = %root))]
    pub fn validate_project(
        &self,
        fs: &dyn Filesystem,
        root: &ProjectRoot,
        files: &[PathBuf],
    ) -> DependencyValidationResult {
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        for file in files {
            let Some(parser) = self.parsers.iter().find(|p| p.matches(file)) else {
                continue;
            };
            let relative = root.relativize(file);
            let parsed = fs
                .read_to_string(file)
                .and_then(|content| parser.parse(&relative, &content));
            match parsed {
                Ok(found) => {
                    debug!(manifest = %relative.display(), count = found.len(), "Manifest parsed");
                    records.extend(found);
                }
                Err(e) => {
                    warn!(manifest = %relative.display(), error = %e, "Skipping manifest");
                    warnings.push(format!("could not parse {}: {e}", relative.display()));
                }
            }
        }

        let mut result = self.validate(records);
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        result
    }

    /// Validate an already-parsed set of records.
    pub fn validate(&self, records: Vec<DependencyRecord>) -> DependencyValidationResult {
        let mut result = DependencyValidationResult::default();

        for mut record in records {
            self.check_format(&mut record, &mut result);
            self.check_vulnerabilities(&mut record, &mut result);
            self.check_outdated(&record, &mut result);
            result.dependencies.push(record);
        }
        result.conflicts = detect_conflicts(&result.dependencies);
        result.refresh_summary();
        result
    }

    fn check_format(&self, record: &mut DependencyRecord, result: &mut DependencyValidationResult) {
        if !is_valid_dependency_name(record.ecosystem, &record.name) {
            result.push_error(DependencyError {
                dependency: record.name.clone(),
                source: record.source.clone(),
                message: format!("invalid {} package name '{}'", record.ecosystem, record.name),
            });
        }
        if !is_valid_dependency_version(record.ecosystem, &record.declared_version) {
            record.resolved_valid = false;
            result.push_error(DependencyError {
                dependency: record.name.clone(),
                source: record.source.clone(),
                message: format!(
                    "invalid {} version '{}' for {}",
                    record.ecosystem, record.declared_version, record.name
                ),
            });
        }
    }

    fn check_vulnerabilities(
        &self,
        record: &mut DependencyRecord,
        result: &mut DependencyValidationResult,
    ) {
        let resolved = clean_version(&record.declared_version);
        let advisories = match self.source.lookup(record.ecosystem, &record.name, resolved) {
            Ok(advisories) => advisories,
            Err(e) => {
                warn!(dependency = %record.spec(), error = %e, "Advisory lookup failed");
                result
                    .warnings
                    .push(format!("could not check security for {}", record.spec()));
                return;
            }
        };

        for advisory in advisories {
            if is_affected(resolved, &advisory) {
                record.known_vulnerability_count += 1;
                result.vulnerabilities.push(DependencyVulnerability {
                    dependency: record.name.clone(),
                    version: record.declared_version.clone(),
                    ecosystem: record.ecosystem,
                    advisory,
                });
            }
        }
    }

    fn check_outdated(&self, record: &DependencyRecord, result: &mut DependencyValidationResult) {
        let Some(latest) = self.latest.get(&(record.ecosystem, record.name.clone())) else {
            return;
        };
        let current = clean_version(&record.declared_version);
        if current == clean_version(latest) || !is_older_than(current, latest, self.mode) {
            return;
        }
        result.outdated.push(OutdatedDependency {
            name: record.name.clone(),
            current: record.declared_version.clone(),
            latest: latest.clone(),
            update_type: update_type(current, latest),
            breaking: is_breaking(current, latest),
        });
    }
}

/// A resolved version is affected unless it is at or past `fixed_in`.
pub fn is_affected(resolved: &str, advisory: &VulnerabilityRecord) -> bool {
    match &advisory.fixed_in {
        None => true,
        Some(fixed) => compare_versions(resolved, fixed) == Ordering::Less,
    }
}

/// Every pair of same-name records with differing constraints.
pub fn detect_conflicts(records: &[DependencyRecord]) -> Vec<DependencyConflict> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&DependencyRecord>> = HashMap::new();
    for record in records {
        let group = groups.entry(record.name.as_str()).or_default();
        if group.is_empty() {
            order.push(record.name.as_str());
        }
        group.push(record);
    }

    let mut conflicts = Vec::new();
    for name in order {
        let group = &groups[name];
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a.declared_version != b.declared_version {
                    conflicts.push(DependencyConflict {
                        name: name.to_string(),
                        first: a.declared_version.clone(),
                        first_source: a.source.clone(),
                        second: b.declared_version.clone(),
                        second_source: b.source.clone(),
                        severity: Severity::Warning,
                    });
                }
            }
        }
    }
    conflicts
}
