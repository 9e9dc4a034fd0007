//! Command handlers, one module per subcommand.

use std::sync::Arc;

use plumb_adapters::{LocalFilesystem, engine_with_builtins};
use plumb_core::application::ValidationEngine;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

pub mod check_versions;
pub mod completions;
pub mod config;
pub mod fix;
pub mod gate;
pub mod init;
pub mod rules;
pub mod validate;

/// Engine over the local filesystem with every built-in checker and parser,
/// adjusted by the `[validation]` section.
pub fn build_engine(config: &AppConfig) -> CliResult<ValidationEngine> {
    let mut engine = engine_with_builtins(Arc::new(LocalFilesystem::new()))
        .with_comparison_mode(config.validation.comparison)
        .with_ignored_dirs(config.validation.ignore.iter().cloned());

    for id in &config.validation.disabled_rules {
        if !engine.rules().contains(id) {
            return Err(CliError::UnknownRule { id: id.clone() });
        }
        engine.rules_mut().set_enabled(id, false)?;
    }

    Ok(engine)
}
