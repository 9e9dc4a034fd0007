//! Auto-fix executor.
//!
//! Resolves a strategy for each fixable issue, then applies the resulting
//! fix, simulates it (dry run) or records why it could not. One bad fix
//! never stops the batch.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ports::Filesystem;
use crate::application::services::fix_strategies::FixStrategyRegistry;
use crate::domain::common::with_suffix;
use crate::domain::{
    AppliedFix, DomainError, FailedFix, FileChange, Fix, FixAction, FixPreview, FixResult,
    ProjectRoot, SkippedFix, ValidationIssue,
};
use crate::error::PlumbResult;

pub const BACKUP_SUFFIX: &str = ".backup";

pub struct AutoFixExecutor {
    fs: Arc<dyn Filesystem>,
    root: ProjectRoot,
    strategies: FixStrategyRegistry,
    dry_run: bool,
    backup_enabled: bool,
}

impl AutoFixExecutor {
    /// Executor that applies fixes and takes backups.
    pub fn new(fs: Arc<dyn Filesystem>, root: ProjectRoot) -> Self {
        Self {
            fs,
            root,
            strategies: FixStrategyRegistry::with_defaults(),
            dry_run: false,
            backup_enabled: true,
        }
    }

    pub fn with_strategies(mut self, strategies: FixStrategyRegistry) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn backups(mut self, enabled: bool) -> Self {
        self.backup_enabled = enabled;
        self
    }

    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub fn set_backup_enabled(&mut self, enabled: bool) {
        self.backup_enabled = enabled;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn backup_enabled(&self) -> bool {
        self.backup_enabled
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn strategies(&self) -> &FixStrategyRegistry {
        &self.strategies
    }

    pub fn strategies_mut(&mut self) -> &mut FixStrategyRegistry {
        &mut self.strategies
    }

    /// Fix every fixable issue under `target_path`.
    ///
    /// Fails only when `target_path` escapes the project root; everything
    /// else is reported per fix in the result.
    pub fn fix_issues(
        &self,
        target_path: impl AsRef<Path>,
        issues: &[ValidationIssue],
    ) -> PlumbResult<FixResult> {
        self.run(target_path.as_ref(), issues, self.dry_run)
    }

    /// Run the pipeline in dry-run mode and describe each would-be change.
    /// Never writes, whatever the executor's own mode is.
    pub fn preview_fixes(
        &self,
        target_path: impl AsRef<Path>,
        issues: &[ValidationIssue],
    ) -> PlumbResult<FixPreview> {
        let target_path = target_path.as_ref();
        let result = self.run(target_path, issues, true)?;
        let scope = self.root.child(target_path)?;
        let changes = result
            .applied
            .iter()
            .map(|applied| self.describe_change(&scope, &applied.fix))
            .collect();
        Ok(FixPreview { result, changes })
    }

    #[instrument(skip(self, target_path, issues), fields(path = %target_path.display(), count = issues.len()))]
    fn run(
        &self,
        target_path: &Path,
        issues: &[ValidationIssue],
        dry_run: bool,
    ) -> PlumbResult<FixResult> {
        let scope = self.root.child(target_path)?;
        let mut result = FixResult {
            dry_run,
            ..FixResult::default()
        };
        let mut modified = BTreeSet::new();

        for issue in issues.iter().filter(|i| i.fixable) {
            result.total_fixes += 1;

            let Some(strategy) = self.strategies.resolve(issue) else {
                debug!(message = %issue.message, "No fix strategy");
                result.skipped.push(skipped(
                    issue,
                    format!(
                        "no fix strategy for rule '{}'",
                        issue.rule_id.as_deref().unwrap_or("none")
                    ),
                ));
                continue;
            };

            let fix = match strategy.build(issue) {
                Ok(Some(fix)) => fix,
                Ok(None) => {
                    debug!(%strategy, "Strategy declined");
                    result
                        .skipped
                        .push(skipped(issue, format!("strategy '{strategy}' declined")));
                    continue;
                }
                Err(e) => {
                    result.failed.push(failed(issue, None, e.to_string()));
                    continue;
                }
            };

            if !fix.automatic {
                result.skipped.push(skipped(
                    issue,
                    format!("manual action required: {}", fix.description),
                ));
                continue;
            }
            if let Err(e) = fix.validate() {
                result.failed.push(failed(issue, Some(fix), e.to_string()));
                continue;
            }

            if dry_run {
                result.applied.push(AppliedFix {
                    fix,
                    issue_message: issue.message.clone(),
                    backup: None,
                });
                continue;
            }

            match self.apply(&scope, &fix) {
                Ok(backup) => {
                    modified.insert(fix.target.clone());
                    result.applied.push(AppliedFix {
                        fix,
                        issue_message: issue.message.clone(),
                        backup,
                    });
                }
                Err(e) => {
                    warn!(file = %fix.target.display(), error = %e, "Fix failed");
                    result.failed.push(failed(issue, Some(fix), e.to_string()));
                }
            }
        }

        result.applied_fixes = result.applied.len();
        result.failed_fixes = result.failed.len();
        result.skipped_fixes = result.skipped.len();
        result.files_modified = modified.len();

        info!(
            applied = result.applied_fixes,
            failed = result.failed_fixes,
            skipped = result.skipped_fixes,
            dry_run,
            "Fix run finished"
        );
        Ok(result)
    }

    /// Apply one fix under `scope`. Returns the backup path, if one was taken.
    pub fn apply(&self, scope: &ProjectRoot, fix: &Fix) -> PlumbResult<Option<PathBuf>> {
        fix.validate()?;
        let target = scope.resolve(&fix.target)?;

        match fix.action {
            FixAction::Create => {
                if self.fs.exists(&target) {
                    return Err(already_exists(&target));
                }
                if let Some(parent) = target.parent() {
                    self.fs.create_dir_all(parent)?;
                }
                self.fs.write_file(&target, &fix.content)?;
                Ok(None)
            }
            FixAction::Replace | FixAction::Insert | FixAction::Delete => {
                self.require_file(&target)?;
                let current = self.fs.read_to_string(&target)?;
                let updated = edit_lines(&current, fix, &target)?;
                let backup = self.backup(&target)?;
                self.fs.write_file(&target, &updated)?;
                Ok(backup)
            }
            FixAction::Rename => {
                self.require_file(&target)?;
                let destination = scope.resolve(&fix.content)?;
                if self.fs.exists(&destination) {
                    return Err(already_exists(&destination));
                }
                let backup = self.backup(&target)?;
                self.fs.rename(&target, &destination)?;
                Ok(backup)
            }
            FixAction::Move => {
                self.require_file(&target)?;
                let destination = scope.resolve(&fix.content)?;
                if self.fs.exists(&destination) {
                    return Err(already_exists(&destination));
                }
                let backup = self.backup(&target)?;
                if let Some(parent) = destination.parent() {
                    self.fs.create_dir_all(parent)?;
                }
                self.fs.rename(&target, &destination)?;
                Ok(backup)
            }
            FixAction::Permissions => Err(DomainError::InvalidFix(format!(
                "permission change on {} must be applied by hand",
                fix.target.display()
            ))
            .into()),
        }
    }

    fn require_file(&self, target: &Path) -> PlumbResult<()> {
        if self.fs.is_file(target) {
            Ok(())
        } else {
            Err(DomainError::MissingTarget {
                path: target.display().to_string(),
            }
            .into())
        }
    }

    fn backup(&self, target: &Path) -> PlumbResult<Option<PathBuf>> {
        if !self.backup_enabled {
            return Ok(None);
        }
        let backup = with_suffix(target, BACKUP_SUFFIX);
        self.fs.copy(target, &backup)?;
        debug!(backup = %backup.display(), "Backup written");
        Ok(Some(backup))
    }

    fn describe_change(&self, scope: &ProjectRoot, fix: &Fix) -> FileChange {
        let current_line = || {
            let target = scope.resolve(&fix.target).ok()?;
            let content = self.fs.read_to_string(&target).ok()?;
            let index = fix.line?.checked_sub(1)?;
            content.lines().nth(index).map(str::to_string)
        };
        let target = fix.target.display();
        let line = fix.line.unwrap_or_default();

        let (before, after, summary) = match fix.action {
            FixAction::Create => (
                None,
                Some(fix.content.clone()),
                format!("create {target} ({} bytes)", fix.content.len()),
            ),
            FixAction::Replace => (
                current_line(),
                Some(fix.content.clone()),
                format!("replace line {line} of {target}"),
            ),
            FixAction::Insert => (
                None,
                Some(fix.content.clone()),
                format!("insert a line before line {line} of {target}"),
            ),
            FixAction::Delete => (current_line(), None, format!("delete line {line} of {target}")),
            FixAction::Rename | FixAction::Move => (
                Some(fix.target.display().to_string()),
                Some(fix.content.clone()),
                format!("{} {target} -> {}", fix.action, fix.content),
            ),
            FixAction::Permissions => (
                None,
                Some(fix.content.clone()),
                format!("chmod {} {target}", fix.content),
            ),
        };

        FileChange {
            path: fix.target.clone(),
            action: fix.action,
            before,
            after,
            summary,
        }
    }
}

/// Apply a line-level action to `content`.
///
/// The file's line ending (`\r\n` if it has any, else `\n`) is kept, as is a
/// trailing newline, so inserting and then deleting the same line restores
/// the input exactly.
pub fn edit_lines(content: &str, fix: &Fix, path: &Path) -> Result<String, DomainError> {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let trailing_newline = content.ends_with(newline);
    let body = content.strip_suffix(newline).unwrap_or(content);
    let mut lines: Vec<&str> = if content.is_empty() {
        Vec::new()
    } else {
        body.split(newline).collect()
    };
    let count = lines.len();
    let line = fix.line.unwrap_or_default();

    let max = match fix.action {
        FixAction::Insert => count + 1,
        FixAction::Replace | FixAction::Delete => count,
        other => {
            return Err(DomainError::InvalidFix(format!(
                "{other} is not a line action"
            )));
        }
    };
    if line == 0 || line > max {
        return Err(DomainError::InvalidLine {
            path: path.display().to_string(),
            line,
            line_count: count,
        });
    }

    match fix.action {
        FixAction::Replace => lines[line - 1] = &fix.content,
        FixAction::Insert => lines.insert(line - 1, &fix.content),
        FixAction::Delete => {
            lines.remove(line - 1);
        }
        _ => {}
    }

    if lines.is_empty() {
        return Ok(String::new());
    }
    let mut out = lines.join(newline);
    if trailing_newline {
        out.push_str(newline);
    }
    Ok(out)
}

fn already_exists(path: &Path) -> crate::error::PlumbError {
    DomainError::AlreadyExists {
        path: path.display().to_string(),
    }
    .into()
}

fn skipped(issue: &ValidationIssue, reason: String) -> SkippedFix {
    SkippedFix {
        issue_message: issue.message.clone(),
        rule_id: issue.rule_id.clone(),
        reason,
    }
}

fn failed(issue: &ValidationIssue, fix: Option<Fix>, error: String) -> FailedFix {
    FailedFix {
        fix,
        issue_message: issue.message.clone(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeFs;
    use crate::domain::Severity;
    use crate::domain::rule::ids;

    const ROOT: &str = "/work/app";

    fn executor(fs: &Arc<FakeFs>) -> AutoFixExecutor {
        AutoFixExecutor::new(fs.clone(), ProjectRoot::new(ROOT))
    }

    fn issue(rule: &str, message: &str, file: &str) -> ValidationIssue {
        ValidationIssue::new("test", Severity::Warning, message)
            .file(file)
            .rule(rule)
            .fixable(true)
    }

    fn scope() -> ProjectRoot {
        ProjectRoot::new(ROOT)
    }

    #[test]
    fn target_outside_root_is_rejected() {
        let fs = Arc::new(FakeFs::new());
        let err = executor(&fs).fix_issues("../elsewhere", &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PlumbError::Domain(DomainError::PathTraversal { .. })
        ));
    }

    #[test]
    fn creates_missing_readme() {
        let fs = Arc::new(FakeFs::new());
        let result = executor(&fs)
            .fix_issues(ROOT, &[issue(ids::README_REQUIRED, "README.md is missing", "README.md")])
            .unwrap();
        assert_eq!(result.applied_fixes, 1);
        assert_eq!(result.files_modified, 1);
        assert!(fs.get("/work/app/README.md").unwrap().starts_with("# "));
    }

    #[test]
    fn create_then_read_back_round_trips() {
        let fs = Arc::new(FakeFs::new());
        let fix = Fix::create("docs/guide.md", "hello\nworld");
        executor(&fs).apply(&scope(), &fix).unwrap();
        assert_eq!(fs.get("/work/app/docs/guide.md").unwrap(), "hello\nworld");
    }

    #[test]
    fn create_refuses_existing_file() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/README.md", "mine"));
        let result = executor(&fs)
            .fix_issues(ROOT, &[issue(ids::README_REQUIRED, "missing", "README.md")])
            .unwrap();
        assert_eq!(result.failed_fixes, 1);
        assert!(result.failed[0].error.contains("already exists"));
        assert_eq!(fs.get("/work/app/README.md").unwrap(), "mine");
    }

    #[test]
    fn replace_backs_up_then_rewrites_one_line() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/a.txt", "one\ntwo\nthree\n"));
        let backup = executor(&fs)
            .apply(&scope(), &Fix::replace_line("a.txt", 2, "TWO"))
            .unwrap();
        assert_eq!(backup, Some(PathBuf::from("/work/app/a.txt.backup")));
        assert_eq!(fs.get("/work/app/a.txt.backup").unwrap(), "one\ntwo\nthree\n");
        assert_eq!(fs.get("/work/app/a.txt").unwrap(), "one\nTWO\nthree\n");
    }

    #[test]
    fn insert_then_delete_restores_content() {
        let original = "alpha\nbeta\ngamma";
        let fs = Arc::new(FakeFs::new().with_file("/work/app/f.txt", original));
        let exec = executor(&fs).backups(false);
        for line in 1..=3 {
            exec.apply(&scope(), &Fix::insert_line("f.txt", line, "inserted"))
                .unwrap();
            exec.apply(&scope(), &Fix::delete_line("f.txt", line)).unwrap();
            assert_eq!(fs.get("/work/app/f.txt").unwrap(), original);
        }
        assert!(fs.get("/work/app/f.txt.backup").is_none());
    }

    #[test]
    fn out_of_range_lines_leave_file_untouched() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/f.txt", "a\nb\n"));
        let exec = executor(&fs);
        for fix in [
            Fix::replace_line("f.txt", 3, "x"),
            Fix::delete_line("f.txt", 3),
            Fix::insert_line("f.txt", 4, "x"),
        ] {
            let err = exec.apply(&scope(), &fix).unwrap_err();
            assert!(matches!(
                err,
                crate::error::PlumbError::Domain(DomainError::InvalidLine { line_count: 2, .. })
            ));
        }
        assert!(exec.apply(&scope(), &Fix::insert_line("f.txt", 3, "c")).is_ok());
        assert_eq!(fs.get("/work/app/f.txt").unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn failed_backup_prevents_mutation() {
        let fs = Arc::new(
            FakeFs::new()
                .with_file("/work/app/f.txt", "a\nb\n")
                .deny_writes("/work/app/f.txt.backup"),
        );
        let result = executor(&fs).apply(&scope(), &Fix::replace_line("f.txt", 1, "z"));
        assert!(result.is_err());
        assert_eq!(fs.get("/work/app/f.txt").unwrap(), "a\nb\n");
    }

    #[test]
    fn rename_fixes_spaces() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/src/my file.txt", "x"));
        let result = executor(&fs)
            .fix_issues(
                ROOT,
                &[issue(
                    ids::NAMING_CONVENTIONS,
                    "file name contains spaces",
                    "src/my file.txt",
                )],
            )
            .unwrap();
        assert_eq!(result.applied_fixes, 1);
        assert!(fs.get("/work/app/src/my_file.txt").is_some());
        assert!(fs.get("/work/app/src/my file.txt").is_none());
        assert!(fs.get("/work/app/src/my file.txt.backup").is_some());
    }

    #[test]
    fn move_creates_destination_directories() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/a.txt", "x"));
        executor(&fs)
            .backups(false)
            .apply(&scope(), &Fix::relocate("a.txt", "nested/dir/a.txt"))
            .unwrap();
        assert_eq!(fs.get("/work/app/nested/dir/a.txt").unwrap(), "x");
    }

    #[test]
    fn fix_targets_cannot_escape_scope() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/a.txt", "x"));
        let err = executor(&fs)
            .apply(&scope(), &Fix::rename("a.txt", "../../etc/a.txt"))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::PlumbError::Domain(DomainError::PathTraversal { .. })
        ));
    }

    #[test]
    fn unmatched_and_manual_issues_are_skipped() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/key.pem", "secret"));
        let issues = [
            issue("custom-rule", "something odd", "x.txt"),
            issue(ids::FILE_PERMISSIONS, "key.pem is world readable", "key.pem"),
            issue(ids::NAMING_CONVENTIONS, "bad name", "fine.txt"),
            ValidationIssue::new("info", Severity::Info, "not fixable"),
        ];
        let result = executor(&fs).fix_issues(ROOT, &issues).unwrap();
        assert_eq!(result.total_fixes, 3);
        assert_eq!(result.skipped_fixes, 3);
        assert!(result.skipped[0].reason.contains("no fix strategy"));
        assert!(result.skipped[1].reason.contains("manual"));
        assert!(result.skipped[2].reason.contains("declined"));
    }

    #[test]
    fn dry_run_never_touches_disk() {
        let fs = Arc::new(
            FakeFs::new()
                .with_file("/work/app/src/my file.txt", "x")
                .with_file("/work/app/templates/main.go", "{{ .Name }}"),
        );
        let before = fs.snapshot();
        let issues = [
            issue(ids::README_REQUIRED, "missing", "README.md"),
            issue(ids::LICENSE_REQUIRED, "missing", "LICENSE"),
            issue(ids::NAMING_CONVENTIONS, "spaces", "src/my file.txt"),
            issue(ids::TEMPLATE_EXTENSION, "ext", "templates/main.go"),
        ];
        let result = executor(&fs).dry_run(true).fix_issues(ROOT, &issues).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.applied_fixes, 4);
        assert_eq!(result.files_modified, 0);
        assert_eq!(fs.snapshot(), before);
    }

    #[test]
    fn preview_leaves_mode_and_disk_alone() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/a.txt", "one\ntwo\n"));
        let exec = executor(&fs);
        let before = fs.snapshot();

        let preview = exec
            .preview_fixes(ROOT, &[issue(ids::README_REQUIRED, "missing", "README.md")])
            .unwrap();

        assert!(!exec.is_dry_run());
        assert_eq!(fs.snapshot(), before);
        assert_eq!(preview.result.applied_fixes, 1);
        assert_eq!(preview.changes.len(), 1);
        assert!(preview.changes[0].summary.starts_with("create README.md"));
    }

    #[test]
    fn preview_reads_current_line() {
        let fs = Arc::new(FakeFs::new().with_file("/work/app/a.txt", "one\ntwo\n"));
        let change = executor(&fs).describe_change(&scope(), &Fix::replace_line("a.txt", 2, "TWO"));
        assert_eq!(change.before.as_deref(), Some("two"));
        assert_eq!(change.after.as_deref(), Some("TWO"));
    }

    #[test]
    fn edit_lines_keeps_crlf_endings() {
        let path = Path::new("w.txt");
        let content = "one\r\ntwo\r\nthree\r\n";
        assert_eq!(
            edit_lines(content, &Fix::replace_line("w.txt", 2, "TWO"), path).unwrap(),
            "one\r\nTWO\r\nthree\r\n"
        );
        let inserted = edit_lines(content, &Fix::insert_line("w.txt", 1, "zero"), path).unwrap();
        assert_eq!(inserted, "zero\r\none\r\ntwo\r\nthree\r\n");
        assert_eq!(
            edit_lines(&inserted, &Fix::delete_line("w.txt", 1), path).unwrap(),
            content
        );
    }

    #[test]
    fn edit_lines_handles_empty_files() {
        let path = Path::new("e.txt");
        assert_eq!(
            edit_lines("", &Fix::insert_line("e.txt", 1, "first"), path).unwrap(),
            "first"
        );
        assert_eq!(
            edit_lines("only\n", &Fix::delete_line("e.txt", 1), path).unwrap(),
            ""
        );
    }
}
