//! `plumb validate`: run every enabled rule over a project tree.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use plumb_core::application::{CancellationToken, ValidationRequest};
use plumb_core::domain::{Severity, ValidationResult};

use crate::{
    cli::ValidateArgs,
    commands::build_engine,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON envelope for `--format json`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    root: &'a Path,
    checked_at: DateTime<Utc>,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: ValidateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let engine = build_engine(&config)?.with_ignored_dirs(args.ignore.iter().cloned());

    let mut request = ValidationRequest::new(&args.path);
    if !args.skip_versions {
        if let Some(versions) = config.versions() {
            request = request.versions(versions);
        }
    }

    let spinner = output.spinner(&format!("Validating {}", args.path.display()));
    let outcome = engine.validate(&request, &CancellationToken::new());
    spinner.finish_and_clear();
    let result = outcome?;

    info!(
        valid = result.valid,
        errors = result.summary.error_count,
        warnings = result.summary.warning_count,
        "Validation finished"
    );

    if output.is_json() {
        output.json(&Report {
            root: &args.path,
            checked_at: Utc::now(),
            result: &result,
        })?;
    } else {
        render(&result, &args, &output)?;
    }

    if result.valid {
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            errors: result.summary.error_count,
            critical: result.summary.critical_count,
        })
    }
}

fn render(result: &ValidationResult, args: &ValidateArgs, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Validated {}", args.path.display()))?;

    let threshold = Severity::from(args.min_severity);
    let shown = result.issues_at_least(threshold);
    for issue in &shown {
        output.issue(issue)?;
    }

    if let Some(deps) = &result.dependencies {
        if deps.summary.total > 0 {
            output.print("")?;
            output.print(&format!(
                "Dependencies: {} total ({} production, {} development, {} peer), {} conflict(s), {} advisory match(es), {} outdated",
                deps.summary.total,
                deps.summary.production,
                deps.summary.development,
                deps.summary.peer,
                deps.summary.conflicts,
                deps.summary.vulnerabilities,
                deps.summary.outdated,
            ))?;
        }
    }

    if !result.suggestions.is_empty() {
        output.print("")?;
        output.header("Suggestions:")?;
        for s in &result.suggestions {
            let breaking = if s.breaking_change { " (breaking)" } else { "" };
            output.print(&format!(
                "  [{}] {} {}: {} -> {}{breaking}  {}",
                s.priority, s.ecosystem, s.field, s.current_value, s.suggested_value, s.reason
            ))?;
        }
    }

    let summary = &result.summary;
    output.print("")?;
    output.print(&format!(
        "{} file(s), {} rule(s): {} error(s) ({} critical), {} warning(s), {} info, {} fixable",
        summary.files_scanned,
        summary.rules_evaluated,
        summary.error_count,
        summary.critical_count,
        summary.warning_count,
        summary.info_count,
        summary.fixable_count,
    ))?;

    let hidden = result.total_issues() - shown.len();
    if hidden > 0 {
        output.info(&format!("{hidden} issue(s) below --min-severity hidden"))?;
    }

    if result.valid {
        output.success("Project is valid")?;
    } else if summary.fixable_count > 0 {
        output.info("Run `plumb fix --dry-run` to preview automatic fixes")?;
    }

    Ok(())
}
