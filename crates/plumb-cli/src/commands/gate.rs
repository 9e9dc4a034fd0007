//! `plumb gate`: may this template be generated with the configured versions?

use plumb_core::domain::ProjectConfig;
use tracing::debug;

use crate::{
    cli::GateArgs, commands::build_engine, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: GateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let engine = build_engine(&config)?;
    let project = project_config(&config);

    debug!(template = %args.template, has_versions = project.versions.is_some(), "Checking template");
    engine.check_generation(Some(&project), &args.template)?;

    if output.is_json() {
        output.json(&serde_json::json!({
            "template": args.template,
            "allowed": true,
        }))?;
    } else {
        output.success(&format!("{} may be generated", args.template))?;
    }
    Ok(())
}

fn project_config(config: &AppConfig) -> ProjectConfig {
    let name = std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".into());
    ProjectConfig {
        name,
        versions: config.versions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{VersionTuple, VersionsSection};

    #[test]
    fn empty_versions_section_is_treated_as_missing() {
        let mut config = AppConfig::default();
        config.versions = Some(VersionsSection::default());
        assert!(project_config(&config).versions.is_none());
    }

    #[test]
    fn configured_versions_reach_the_gate() {
        let mut config = AppConfig::default();
        config.versions = Some(VersionsSection {
            node: None,
            go: Some(VersionTuple {
                runtime: "1.22".into(),
                ..VersionTuple::default()
            }),
        });
        let versions = project_config(&config).versions.unwrap();
        assert!(versions.go.is_some());
    }
}
