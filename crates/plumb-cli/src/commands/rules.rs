//! `plumb rules`: list the rule registry.

use plumb_core::domain::{RuleCategory, ValidationRule};

use crate::{
    cli::RulesArgs, commands::build_engine, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: RulesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let engine = build_engine(&config)?;
    let registry = engine.rules();

    let rules: Vec<&ValidationRule> = match args.category {
        Some(category) => registry.rules_by_category(category.into()),
        None => registry.rules().iter().collect(),
    }
    .into_iter()
    .filter(|r| r.enabled || !args.enabled_only)
    .collect();

    if output.is_json() {
        output.json(&rules)?;
        return Ok(());
    }

    let categories: Vec<RuleCategory> = match args.category {
        Some(category) => vec![category.into()],
        None => RuleCategory::ALL.to_vec(),
    };

    for category in categories {
        let in_category: Vec<_> = rules.iter().filter(|r| r.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        output.header(&format!("{category}:"))?;
        for rule in in_category {
            output.print(&format_rule(rule))?;
        }
    }

    Ok(())
}

fn format_rule(rule: &ValidationRule) -> String {
    let mut flags = Vec::new();
    if !rule.enabled {
        flags.push("disabled");
    }
    if rule.fixable {
        flags.push("fixable");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };
    format!(
        "  {:<28} {:<8} {}{flags}",
        rule.id,
        rule.severity.as_str(),
        rule.description
    )
}
