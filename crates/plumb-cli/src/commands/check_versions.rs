//! `plumb check-versions`: validate runtime/toolchain version tuples.

use plumb_core::domain::{Severity, VersionConfig, VersionValidationResult};

use crate::{
    cli::CheckVersionsArgs,
    commands::build_engine,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: CheckVersionsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let tuples = resolve_tuples(&args, &config)?;
    let engine = build_engine(&config)?;
    let validator = engine.version_validator();

    let results: Vec<VersionValidationResult> =
        tuples.iter().map(|tuple| validator.validate(tuple)).collect();

    if output.is_json() {
        output.json(&results)?;
    } else {
        for result in &results {
            render(result, &output)?;
        }
    }

    let errors: usize = results
        .iter()
        .map(|r| r.errors.iter().filter(|e| e.severity.is_error()).count())
        .sum();
    let critical: usize = results.iter().map(|r| r.critical_errors().count()).sum();

    if results.iter().all(|r| r.valid) {
        Ok(())
    } else {
        Err(CliError::ValidationFailed { errors, critical })
    }
}

/// The tuple given by flags, else every tuple in the configuration.
fn resolve_tuples(args: &CheckVersionsArgs, config: &AppConfig) -> CliResult<Vec<VersionConfig>> {
    if let (Some(ecosystem), Some(runtime)) = (args.ecosystem, args.runtime.as_ref()) {
        let mut tuple = VersionConfig::new(ecosystem.into(), runtime.clone()).lts(args.lts);
        tuple.types_package = args.types_package.clone();
        tuple.build_tool = args.build_tool.clone();
        tuple.image = args.image.clone();
        return Ok(vec![tuple]);
    }

    match config.versions() {
        Some(versions) => Ok(versions.iter().cloned().collect()),
        None => Err(CliError::invalid_input(
            "no version tuples to check: pass --ecosystem and --runtime, or add a [versions] section to the configuration",
        )),
    }
}

fn render(result: &VersionValidationResult, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{}:", result.ecosystem))?;

    for error in &result.errors {
        let line = format!(
            "{} {} '{}': {} [{}]",
            error.severity, error.field, error.value, error.message, error.code
        );
        match error.severity {
            Severity::Critical | Severity::Error => output.error(&line)?,
            Severity::Warning => output.warning(&line)?,
            Severity::Info => output.info(&line)?,
        }
    }
    for warning in &result.warnings {
        output.warning(&format!(
            "{} '{}': {}",
            warning.field, warning.value, warning.message
        ))?;
    }
    for s in &result.suggestions {
        let breaking = if s.breaking_change { " (breaking)" } else { "" };
        output.info(&format!(
            "[{}] {}: {} -> {}{breaking}  {}",
            s.priority, s.field, s.current_value, s.suggested_value, s.reason
        ))?;
    }

    if result.valid {
        output.success(&format!("{} versions are compatible", result.ecosystem))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EcosystemArg;
    use crate::config::{VersionTuple, VersionsSection};
    use plumb_core::domain::Ecosystem;

    fn args() -> CheckVersionsArgs {
        CheckVersionsArgs {
            ecosystem: None,
            runtime: None,
            types_package: None,
            build_tool: None,
            image: None,
            lts: false,
        }
    }

    #[test]
    fn flags_take_precedence_over_config() {
        let mut config = AppConfig::default();
        config.versions = Some(VersionsSection {
            node: Some(VersionTuple {
                runtime: ">=18.0.0".into(),
                ..VersionTuple::default()
            }),
            go: None,
        });
        let args = CheckVersionsArgs {
            ecosystem: Some(EcosystemArg::Go),
            runtime: Some("1.22".into()),
            image: Some("golang:1.22-alpine".into()),
            ..args()
        };

        let tuples = resolve_tuples(&args, &config).unwrap();
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0].ecosystem, Ecosystem::Go);
        assert_eq!(tuples[0].image.as_deref(), Some("golang:1.22-alpine"));
    }

    #[test]
    fn config_tuples_are_used_without_flags() {
        let mut config = AppConfig::default();
        config.versions = Some(VersionsSection {
            node: Some(VersionTuple {
                runtime: ">=20.0.0".into(),
                types_package: Some("^20.17.0".into()),
                ..VersionTuple::default()
            }),
            go: Some(VersionTuple {
                runtime: "1.22".into(),
                ..VersionTuple::default()
            }),
        });

        let tuples = resolve_tuples(&args(), &config).unwrap();
        assert_eq!(tuples.len(), 2);
    }

    #[test]
    fn nothing_to_check_is_user_error() {
        let err = resolve_tuples(&args(), &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
