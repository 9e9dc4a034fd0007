//! Command-line surface of `plumb` (clap derive). Handlers get these structs
//! and convert the value enums into core types through the `From` impls below.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use plumb_core::domain::{Ecosystem, RuleCategory};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "plumb",
    bin_name = "plumb",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Validate generated projects and fix what can be fixed",
    long_about = "Plumb checks project trees against a rule set: structure, \
                  manifest syntax, secrets, dependency conflicts and advisories, \
                  and runtime/toolchain version compatibility.",
    after_help = "EXAMPLES:\n\
        \x20 plumb validate ./my-app\n\
        \x20 plumb fix ./my-app --dry-run\n\
        \x20 plumb check-versions --ecosystem node --runtime '>=20.0.0' --types '^20.17.0'\n\
        \x20 plumb completions bash > /usr/share/bash-completion/completions/plumb",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a project tree.
    #[command(
        visible_alias = "v",
        about = "Validate a project",
        after_help = "EXAMPLES:\n\
            \x20 plumb validate\n\
            \x20 plumb validate ./my-app --min-severity error\n\
            \x20 plumb validate ./my-app --format json"
    )]
    Validate(ValidateArgs),

    /// Apply automatic fixes.
    #[command(
        about = "Fix fixable issues",
        after_help = "EXAMPLES:\n\
            \x20 plumb fix --dry-run\n\
            \x20 plumb fix ./my-app --yes\n\
            \x20 plumb fix ./my-app --yes --no-backup"
    )]
    Fix(FixArgs),

    /// List validation rules.
    #[command(
        visible_alias = "ls",
        about = "List validation rules",
        after_help = "EXAMPLES:\n\
            \x20 plumb rules\n\
            \x20 plumb rules --category security"
    )]
    Rules(RulesArgs),

    /// Check a runtime/toolchain version tuple.
    #[command(
        about = "Check version compatibility",
        after_help = "EXAMPLES:\n\
            \x20 plumb check-versions                 # tuples from the config file\n\
            \x20 plumb check-versions --ecosystem node --runtime '>=20.0.0' --types '^16.0.0'\n\
            \x20 plumb check-versions --ecosystem go --runtime 1.22 --image golang:1.22-alpine"
    )]
    CheckVersions(CheckVersionsArgs),

    /// Check whether a template may be generated with the configured versions.
    #[command(
        about = "Pre-generation gate for a template",
        after_help = "EXAMPLES:\n\
            \x20 plumb gate backend/go.mod\n\
            \x20 plumb gate frontend/package.json"
    )]
    Gate(GateArgs),

    /// Initialise a Plumb configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 plumb init           # user config location\n\
            \x20 plumb init --local   # .plumb.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 plumb completions bash > ~/.local/share/bash-completion/completions/plumb\n\
            \x20 plumb completions zsh  > ~/.zfunc/_plumb\n\
            \x20 plumb completions fish > ~/.config/fish/completions/plumb.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Plumb configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 plumb config get fix.backup\n\
            \x20 plumb config set validation.comparison semantic\n\
            \x20 plumb config list"
    )]
    Config(ConfigCommands),
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `plumb validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Project directory.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    /// Hide issues below this severity.
    #[arg(
        long = "min-severity",
        value_enum,
        default_value = "info",
        help = "Lowest severity to print"
    )]
    pub min_severity: SeverityArg,

    /// Skip version compatibility checks even when versions are configured.
    #[arg(long = "skip-versions", help = "Skip version compatibility checks")]
    pub skip_versions: bool,

    /// Extra directory names to skip.
    #[arg(
        long = "ignore",
        value_name = "DIR",
        value_delimiter = ',',
        help = "Directory names to skip (repeatable or comma-separated)"
    )]
    pub ignore: Vec<String>,
}

// ── fix ───────────────────────────────────────────────────────────────────────

/// Arguments for `plumb fix`.
#[derive(Debug, Args)]
pub struct FixArgs {
    /// Project directory.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    /// Show what would change without writing any files.
    #[arg(long = "dry-run", help = "Preview fixes without applying them")]
    pub dry_run: bool,

    /// Do not write `.backup` copies before modifying files.
    #[arg(long = "no-backup", help = "Skip .backup copies")]
    pub no_backup: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Apply without asking")]
    pub yes: bool,
}

// ── rules ─────────────────────────────────────────────────────────────────────

/// Arguments for `plumb rules`.
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Filter by category.
    #[arg(long = "category", value_enum, help = "Filter by category")]
    pub category: Option<CategoryArg>,

    /// Hide rules disabled by configuration.
    #[arg(long = "enabled", help = "Only show enabled rules")]
    pub enabled_only: bool,
}

// ── check-versions ────────────────────────────────────────────────────────────

/// Arguments for `plumb check-versions`.
///
/// With no `--ecosystem`, every tuple in the configuration is checked.
#[derive(Debug, Args)]
pub struct CheckVersionsArgs {
    /// Ecosystem of the tuple given on the command line.
    #[arg(
        long = "ecosystem",
        value_enum,
        requires = "runtime",
        help = "Ecosystem of the tuple to check"
    )]
    pub ecosystem: Option<EcosystemArg>,

    /// Runtime constraint, e.g. `>=20.0.0` or `1.22`.
    #[arg(long = "runtime", requires = "ecosystem", help = "Runtime version constraint")]
    pub runtime: Option<String>,

    /// Types package constraint (`@types/node`).
    #[arg(long = "types", help = "Types package version constraint")]
    pub types_package: Option<String>,

    /// Build tool constraint.
    #[arg(long = "build-tool", help = "Build tool version constraint")]
    pub build_tool: Option<String>,

    /// Container image reference.
    #[arg(long = "image", help = "Container image, e.g. node:20-alpine")]
    pub image: Option<String>,

    /// Mark the tuple as an LTS selection.
    #[arg(long = "lts", help = "The runtime is meant to be an LTS release")]
    pub lts: bool,
}

// ── gate ──────────────────────────────────────────────────────────────────────

/// Arguments for `plumb gate`.
#[derive(Debug, Args)]
pub struct GateArgs {
    /// Template path, e.g. `backend/go.mod`.
    #[arg(value_name = "TEMPLATE_PATH", help = "Template path to check")]
    pub template: String,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `plumb init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.plumb.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `plumb completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `plumb config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `fix.backup`.
        key: String,
    },
    /// Set a key in the configuration file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value (`true`/`false`, numbers and strings are recognised).
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Info,
    Warning,
    Error,
    Critical,
}

impl From<SeverityArg> for plumb_core::domain::Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Self::Info,
            SeverityArg::Warning => Self::Warning,
            SeverityArg::Error => Self::Error,
            SeverityArg::Critical => Self::Critical,
        }
    }
}

/// Rule categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Structure,
    Dependencies,
    Security,
    Quality,
    Config,
}

impl From<CategoryArg> for RuleCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Structure => Self::Structure,
            CategoryArg::Dependencies => Self::Dependencies,
            CategoryArg::Security => Self::Security,
            CategoryArg::Quality => Self::Quality,
            CategoryArg::Config => Self::Config,
        }
    }
}

/// Ecosystems with version tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EcosystemArg {
    /// Node.js (npm); also accepted as `npm`.
    #[value(alias = "npm")]
    Node,
    /// Go; also accepted as `golang`.
    #[value(alias = "golang")]
    Go,
}

impl From<EcosystemArg> for Ecosystem {
    fn from(arg: EcosystemArg) -> Self {
        match arg {
            EcosystemArg::Node => Self::Npm,
            EcosystemArg::Go => Self::Go,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn validate_defaults_to_current_directory() {
        let cli = Cli::parse_from(["plumb", "validate"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.min_severity, SeverityArg::Info);
    }

    #[test]
    fn ignore_accepts_comma_lists() {
        let cli = Cli::parse_from(["plumb", "validate", "--ignore", "dist,build", "--ignore", "out"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.ignore, ["dist", "build", "out"]);
    }

    #[test]
    fn npm_alias_maps_to_node() {
        let cli = Cli::parse_from([
            "plumb",
            "check-versions",
            "--ecosystem",
            "npm",
            "--runtime",
            ">=20.0.0",
        ]);
        let Commands::CheckVersions(args) = cli.command else {
            panic!("expected CheckVersions command");
        };
        assert_eq!(args.ecosystem, Some(EcosystemArg::Node));
        assert_eq!(Ecosystem::from(EcosystemArg::Node), Ecosystem::Npm);
    }

    #[test]
    fn runtime_requires_ecosystem() {
        let result = Cli::try_parse_from(["plumb", "check-versions", "--runtime", "1.22"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["plumb", "--quiet", "--verbose", "rules"]);
        assert!(result.is_err());
    }

    #[test]
    fn fix_flags_parse() {
        let cli = Cli::parse_from(["plumb", "fix", "app", "--dry-run", "--no-backup", "-y"]);
        let Commands::Fix(args) = cli.command else {
            panic!("expected Fix command");
        };
        assert!(args.dry_run && args.no_backup && args.yes);
        assert_eq!(args.path, PathBuf::from("app"));
    }
}
