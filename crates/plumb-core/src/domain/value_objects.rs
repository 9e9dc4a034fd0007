//! Domain value objects: severities, rule categories, ecosystems, fix actions.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Per-ecosystem knowledge (minimum versions, image families, recommended
//! tuples) lives in `compatibility.rs`. This file only defines the types,
//! their string representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Severity ──────────────────────────────────────────────────────────────────

/// Severity of a validation issue.
///
/// Ordered `Info < Warning < Error < Critical`. `Critical` is a superset of
/// `Error`: anything filtering on "at least error" must keep critical issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// True for `Error` and `Critical`.
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    pub fn is_at_least(self, threshold: Severity) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            other => Err(DomainError::UnknownValue {
                kind: "severity",
                value: other.into(),
            }),
        }
    }
}

// ── RuleCategory ──────────────────────────────────────────────────────────────

/// Grouping used by the rule registry's category index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Structure,
    Dependencies,
    Security,
    Quality,
    Config,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 5] = [
        Self::Structure,
        Self::Dependencies,
        Self::Security,
        Self::Quality,
        Self::Config,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Dependencies => "dependencies",
            Self::Security => "security",
            Self::Quality => "quality",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structure" => Ok(Self::Structure),
            "dependencies" | "deps" => Ok(Self::Dependencies),
            "security" => Ok(Self::Security),
            "quality" => Ok(Self::Quality),
            "config" | "configuration" => Ok(Self::Config),
            other => Err(DomainError::UnknownValue {
                kind: "rule category",
                value: other.into(),
            }),
        }
    }
}

// ── Ecosystem ─────────────────────────────────────────────────────────────────

/// A package-management family whose manifests can be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// JavaScript / TypeScript (`package.json`), Node.js runtime.
    Npm,
    /// Go modules (`go.mod`).
    Go,
    /// Rust crates (`Cargo.toml`).
    Cargo,
    /// Python packages (`requirements.txt`).
    Pip,
}

impl Ecosystem {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Go => "go",
            Self::Cargo => "cargo",
            Self::Pip => "pip",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" | "node" | "nodejs" | "javascript" | "typescript" => Ok(Self::Npm),
            "go" | "golang" => Ok(Self::Go),
            "cargo" | "rust" => Ok(Self::Cargo),
            "pip" | "python" | "pypi" => Ok(Self::Pip),
            other => Err(DomainError::UnknownValue {
                kind: "ecosystem",
                value: other.into(),
            }),
        }
    }
}

// ── DependencyClass ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyClass {
    Production,
    Development,
    Peer,
    Indirect,
}

impl DependencyClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Peer => "peer",
            Self::Indirect => "indirect",
        }
    }
}

impl fmt::Display for DependencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── AdvisorySeverity ──────────────────────────────────────────────────────────

/// Severity of a published security advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorySeverity {
    Critical,
    High,
    Moderate,
    Low,
    Info,
}

impl AdvisorySeverity {
    /// Ranking used to prioritise security updates (higher first).
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 5,
            Self::High => 4,
            Self::Moderate => 3,
            Self::Low => 2,
            Self::Info => 1,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for AdvisorySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── FixAction ─────────────────────────────────────────────────────────────────

/// Filesystem mutation performed by a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixAction {
    /// Write a new file; `content` is the file body.
    Create,
    /// Overwrite one line; `content` is the new line.
    Replace,
    /// Insert a line before `line`; `content` is the new line.
    Insert,
    /// Remove `line`.
    Delete,
    /// Rename the target; `content` is the destination path.
    Rename,
    /// Move the target into another directory; `content` is the destination path.
    Move,
    /// Record an intended mode change; `content` is the octal mode.
    /// Never applied automatically.
    Permissions,
}

impl FixAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Replace => "replace",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::Permissions => "permissions",
        }
    }

    /// Line-oriented actions need a 1-based `line`.
    pub const fn requires_line(self) -> bool {
        matches!(self, Self::Replace | Self::Insert | Self::Delete)
    }

    /// Whether applying the action changes an existing file (and so is
    /// preceded by a backup when backups are enabled).
    pub const fn mutates_existing(self) -> bool {
        !matches!(self, Self::Create | Self::Permissions)
    }
}

impl fmt::Display for FixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Suggestions & updates ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    Low,
    Medium,
    High,
}

impl fmt::Display for SuggestionPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Major,
    Minor,
}

/// How "is this version older" is decided for outdated detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Plain string comparison of the cleaned versions. `"10.0.0"` sorts
    /// before `"9.0.0"` under this mode.
    #[default]
    Lexicographic,
    /// Numeric MAJOR.MINOR.PATCH comparison.
    Semantic,
}

impl FromStr for ComparisonMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexicographic" | "string" => Ok(Self::Lexicographic),
            "semantic" | "semver" => Ok(Self::Semantic),
            other => Err(DomainError::UnknownValue {
                kind: "comparison mode",
                value: other.into(),
            }),
        }
    }
}
