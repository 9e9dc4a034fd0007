//! # Plumb CLI
//!
//! Validate generated projects and apply automatic fixes.
//!
//! Arguments are parsed before anything else so `--help` never touches the
//! configuration. Configuration is loaded before logging because it may name
//! a log file; a broken config is still reported through the usual error path.
//!
//! ## Exit codes
//!
//! | Code | Meaning                               |
//! |------|---------------------------------------|
//! |  0   | Success                               |
//! |  1   | Validation failed, or internal error  |
//! |  2   | User / input error                    |
//! |  3   | Resource not found                    |
//! |  4   | Configuration error                   |

use std::{io::IsTerminal, process::ExitCode};

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // A missing .env is not an error.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here, with exit code 0.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };
    let verbose = cli.global.verbose > 0;
    let color = !cli.global.no_color && std::io::stderr().is_terminal();

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let _ = init_logging(&cli.global, None);
            let err = CliError::config("Failed to load configuration", e);
            return handle_error(err, verbose, color);
        }
    };

    let log_file = cli
        .global
        .log_file
        .as_deref()
        .or(config.logging.file.as_deref());
    let _log_guard = match init_logging(&cli.global, log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        format = ?cli.global.output_format,
        "plumb starting"
    );

    let output = OutputManager::new(&cli.global, &config);
    match run(cli, config, output) {
        Ok(()) => {
            info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, color),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Validate(cmd) => commands::validate::execute(cmd, config, output),
        Commands::Fix(cmd) => commands::fix::execute(cmd, config, output),
        Commands::Rules(cmd) => commands::rules::execute(cmd, config, output),
        Commands::CheckVersions(cmd) => commands::check_versions::execute(cmd, config, output),
        Commands::Gate(cmd) => commands::gate::execute(cmd, config, output),
        Commands::Init(cmd) => commands::init::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => {
            commands::config::execute(cmd, cli.global.config, config, output)
        }
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
///
/// A failed validation has already printed its issues, so only the one-line
/// summary goes to stderr for it.
fn handle_error(err: CliError, verbose: bool, color: bool) -> ExitCode {
    err.log();

    match &err {
        CliError::ValidationFailed { .. } => eprintln!("{err}"),
        _ => eprint!("{}", err.render(verbose, color)),
    }

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
