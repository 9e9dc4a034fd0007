//! Fix descriptors and fix outcomes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::value_objects::FixAction;

/// A concrete, serializable file mutation produced from one issue.
///
/// A fix is never partially applied: the executor either performs the whole
/// action or leaves the target untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub id: String,
    pub kind: String,
    pub description: String,
    /// Target file, relative to the project root.
    pub target: PathBuf,
    pub action: FixAction,
    /// File body, line text, destination path or mode, depending on `action`.
    pub content: String,
    /// 1-based line for replace/insert/delete.
    pub line: Option<usize>,
    pub automatic: bool,
}

impl Fix {
    pub fn new(
        kind: impl Into<String>,
        action: FixAction,
        target: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.into(),
            description: String::new(),
            target: target.into(),
            action,
            content: content.into(),
            line: None,
            automatic: !matches!(action, FixAction::Permissions),
        }
    }

    pub fn create(target: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new("create_file", FixAction::Create, target, content)
    }

    pub fn replace_line(target: impl Into<PathBuf>, line: usize, text: impl Into<String>) -> Self {
        Self::new("replace_line", FixAction::Replace, target, text).line(line)
    }

    pub fn insert_line(target: impl Into<PathBuf>, line: usize, text: impl Into<String>) -> Self {
        Self::new("insert_line", FixAction::Insert, target, text).line(line)
    }

    pub fn delete_line(target: impl Into<PathBuf>, line: usize) -> Self {
        Self::new("delete_line", FixAction::Delete, target, "").line(line)
    }

    pub fn rename(target: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
        Self::new("rename_file", FixAction::Rename, target, destination)
    }

    pub fn relocate(target: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
        Self::new("move_file", FixAction::Move, target, destination)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Structural checks that do not need the filesystem.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.target.as_os_str().is_empty() {
            return Err(DomainError::InvalidFix("fix has no target".into()));
        }
        if self.action.requires_line() {
            match self.line {
                Some(0) | None => {
                    return Err(DomainError::InvalidFix(format!(
                        "{} fix on {} needs a 1-based line",
                        self.action,
                        self.target.display()
                    )));
                }
                Some(_) => {}
            }
        }
        if matches!(self.action, FixAction::Rename | FixAction::Move) && self.content.is_empty() {
            return Err(DomainError::InvalidFix(format!(
                "{} fix on {} has no destination",
                self.action,
                self.target.display()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFix {
    pub fix: Fix,
    pub issue_message: String,
    /// Where the original content was copied, when a backup was taken.
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFix {
    pub fix: Option<Fix>,
    pub issue_message: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFix {
    pub issue_message: String,
    pub rule_id: Option<String>,
    pub reason: String,
}

/// Outcome of one `fix_issues` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResult {
    pub total_fixes: usize,
    pub applied_fixes: usize,
    pub failed_fixes: usize,
    pub skipped_fixes: usize,
    pub files_modified: usize,
    pub dry_run: bool,
    pub applied: Vec<AppliedFix>,
    pub failed: Vec<FailedFix>,
    pub skipped: Vec<SkippedFix>,
}

impl FixResult {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Human-readable description of what a simulated fix would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub action: FixAction,
    pub before: Option<String>,
    pub after: Option<String>,
    pub summary: String,
}

/// A dry-run result plus one [`FileChange`] per would-be fix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixPreview {
    pub result: FixResult,
    pub changes: Vec<FileChange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_fixes_are_manual() {
        let fix = Fix::new("chmod", FixAction::Permissions, "certs/key.pem", "600");
        assert!(!fix.automatic);
        assert!(Fix::create("README.md", "# x").automatic);
    }

    #[test]
    fn line_actions_need_a_line() {
        let mut fix = Fix::replace_line("a.txt", 1, "x");
        assert!(fix.validate().is_ok());
        fix.line = Some(0);
        assert!(fix.validate().is_err());
        fix.line = None;
        assert!(fix.validate().is_err());
    }

    #[test]
    fn rename_needs_destination() {
        assert!(Fix::rename("my file.txt", "").validate().is_err());
        assert!(Fix::rename("my file.txt", "my_file.txt").validate().is_ok());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Fix::create("a", "").id, Fix::create("a", "").id);
    }
}
