//! Validation issues and aggregated results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::dependency::DependencyValidationResult;
use crate::domain::entities::version_config::{VersionSuggestion, VersionValidationResult};
use crate::domain::value_objects::Severity;

/// One problem found in a project.
///
/// Value object: produced by checkers and validators, never mutated after
/// emission, passed around by clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Short machine-readable kind, e.g. `missing_file` or `syntax`.
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    /// Path relative to the project root; empty for project-wide issues.
    pub file: PathBuf,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub rule_id: Option<String>,
    pub fixable: bool,
}

impl ValidationIssue {
    pub fn new(kind: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity,
            message: message.into(),
            file: PathBuf::new(),
            line: None,
            column: None,
            rule_id: None,
            fixable: false,
        }
    }

    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    pub fn at(mut self, line: usize, column: Option<usize>) -> Self {
        self.line = Some(line);
        self.column = column;
        self
    }

    pub fn rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn fixable(mut self, fixable: bool) -> Self {
        self.fixable = fixable;
        self
    }

    /// `file:line:column` for display.
    pub fn location(&self) -> String {
        let mut out = self.file.display().to_string();
        if let Some(line) = self.line {
            out.push_str(&format!(":{line}"));
            if let Some(column) = self.column {
                out.push_str(&format!(":{column}"));
            }
        }
        out
    }
}

/// Counters reported by a leaf syntax checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub total_properties: usize,
    pub valid_properties: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub missing_required: usize,
}

/// Output of a leaf syntax checker for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub summary: ConfigSummary,
}

impl ConfigValidationResult {
    pub fn valid(total_properties: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            summary: ConfigSummary {
                total_properties,
                valid_properties: total_properties,
                ..ConfigSummary::default()
            },
        }
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.summary.error_count += 1;
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.summary.warning_count += 1;
        self.warnings.push(issue);
    }
}

/// Counters over a whole validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub files_scanned: usize,
    pub rules_evaluated: usize,
    pub error_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub fixable_count: usize,
}

/// Everything a validation run found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub infos: Vec<ValidationIssue>,
    pub suggestions: Vec<VersionSuggestion>,
    pub dependencies: Option<DependencyValidationResult>,
    pub versions: Vec<VersionValidationResult>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }

    /// File an issue under its severity and update counters. Errors and
    /// critical issues make the result invalid.
    pub fn push(&mut self, issue: ValidationIssue) {
        if issue.fixable {
            self.summary.fixable_count += 1;
        }
        match issue.severity {
            Severity::Critical => {
                self.valid = false;
                self.summary.critical_count += 1;
                self.summary.error_count += 1;
                self.errors.push(issue);
            }
            Severity::Error => {
                self.valid = false;
                self.summary.error_count += 1;
                self.errors.push(issue);
            }
            Severity::Warning => {
                self.summary.warning_count += 1;
                self.warnings.push(issue);
            }
            Severity::Info => {
                self.summary.info_count += 1;
                self.infos.push(issue);
            }
        }
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        for issue in issues {
            self.push(issue);
        }
    }

    /// Every issue, errors first.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.infos.iter())
    }

    /// Issues at or above `threshold`; critical issues always pass an
    /// error threshold.
    pub fn issues_at_least(&self, threshold: Severity) -> Vec<&ValidationIssue> {
        self.issues()
            .filter(|i| i.severity.is_at_least(threshold))
            .collect()
    }

    pub fn fixable_issues(&self) -> Vec<ValidationIssue> {
        self.issues().filter(|i| i.fixable).cloned().collect()
    }

    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.infos.len()
    }
}
