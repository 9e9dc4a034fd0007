//! `plumb fix`: validate, then apply the fix strategy for every fixable issue.
//!
//! Dispatch sequence:
//! 1. Validate the project (versions excluded; they are never auto-fixed)
//! 2. Preview the fixes
//! 3. Stop there on `--dry-run`, otherwise confirm unless `--yes`
//! 4. Apply, writing `.backup` copies unless disabled

use tracing::{info, instrument};

use plumb_core::application::{CancellationToken, ValidationRequest};
use plumb_core::domain::{FixPreview, FixResult};

use crate::{
    cli::FixArgs,
    commands::build_engine,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.path.display(), dry_run = args.dry_run))]
pub fn execute(args: FixArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let engine = build_engine(&config)?;
    let dry_run = args.dry_run || config.fix.dry_run;
    let backup = config.fix.backup && !args.no_backup;

    let spinner = output.spinner(&format!("Validating {}", args.path.display()));
    let outcome = engine.validate(
        &ValidationRequest::new(&args.path),
        &CancellationToken::new(),
    );
    spinner.finish_and_clear();
    let validation = outcome?;

    let fixable = validation.fixable_issues();
    if fixable.is_empty() {
        if output.is_json() {
            output.json(&FixResult {
                dry_run,
                ..FixResult::default()
            })?;
        } else {
            output.success("Nothing to fix")?;
        }
        return Ok(());
    }

    let fixer = engine.auto_fixer(&args.path).backups(backup);
    let preview = fixer.preview_fixes(".", &fixable)?;

    if dry_run {
        if output.is_json() {
            output.json(&preview)?;
        } else {
            render_preview(&preview, &output)?;
            output.info("Dry run: no files were changed")?;
        }
        return Ok(());
    }

    if preview.result.applied_fixes == 0 {
        render_result(&preview.result, &output)?;
        return Ok(());
    }

    if !args.yes {
        if !output.is_interactive() || output.is_json() {
            return Err(CliError::invalid_input(
                "refusing to modify files without --yes in a non-interactive session",
            ));
        }
        render_preview(&preview, &output)?;
        if !confirm(preview.result.applied_fixes)? {
            return Err(CliError::Cancelled);
        }
    }

    let result = fixer.fix_issues(".", &fixable)?;
    info!(
        applied = result.applied_fixes,
        failed = result.failed_fixes,
        skipped = result.skipped_fixes,
        "Fixes applied"
    );

    if output.is_json() {
        output.json(&result)?;
    } else {
        render_result(&result, &output)?;
    }

    if result.is_clean() {
        Ok(())
    } else {
        Err(CliError::invalid_input(format!(
            "{} fix(es) could not be applied",
            result.failed_fixes
        )))
    }
}

fn render_preview(preview: &FixPreview, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{} change(s) planned:", preview.changes.len()))?;
    for change in &preview.changes {
        output.print(&format!(
            "  {:<12} {}  {}",
            change.action.to_string(),
            change.path.display(),
            change.summary
        ))?;
    }
    for skipped in &preview.result.skipped {
        output.warning(&format!(
            "skip: {} ({})",
            skipped.issue_message, skipped.reason
        ))?;
    }
    for failed in &preview.result.failed {
        output.error(&format!("{}: {}", failed.issue_message, failed.error))?;
    }
    Ok(())
}

fn render_result(result: &FixResult, output: &OutputManager) -> CliResult<()> {
    for applied in &result.applied {
        let backup = applied
            .backup
            .as_ref()
            .map(|b| format!(" (backup: {})", b.display()))
            .unwrap_or_default();
        output.success(&format!("{}{backup}", applied.fix.description))?;
    }
    for skipped in &result.skipped {
        output.warning(&format!(
            "skipped: {} ({})",
            skipped.issue_message, skipped.reason
        ))?;
    }
    for failed in &result.failed {
        output.error(&format!("failed: {}: {}", failed.issue_message, failed.error))?;
    }
    output.print(&format!(
        "{} applied, {} failed, {} skipped, {} file(s) modified",
        result.applied_fixes, result.failed_fixes, result.skipped_fixes, result.files_modified
    ))?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm(count: usize) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!("Apply {count} fix(es)?"))
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_count: usize) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}
