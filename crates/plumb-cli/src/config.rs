//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the pieces handed to the
//! engine builders.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `PLUMB__SECTION__KEY`, e.g. `PLUMB__FIX__BACKUP=false`
//! 3. Config file: `--config <FILE>`, else the user config file and then
//!    `.plumb.toml` in the current directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use plumb_core::domain::{ComparisonMode, Ecosystem, VersionConfig, VersionsConfig};

/// Name of the per-project configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".plumb.toml";

const ENV_PREFIX: &str = "PLUMB";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub validation: ValidationSection,
    pub fix: FixSection,
    pub output: OutputSection,
    pub logging: LoggingSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<VersionsSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSection {
    /// Rule ids to disable.
    pub disabled_rules: Vec<String>,
    /// Directory names skipped in addition to the engine defaults.
    pub ignore: Vec<String>,
    /// How outdated dependencies are detected.
    pub comparison: ComparisonMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixSection {
    pub backup: bool,
    pub dry_run: bool,
}

impl Default for FixSection {
    fn default() -> Self {
        Self {
            backup: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Append logs to this file in addition to stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// `[versions.node]` / `[versions.go]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<VersionTuple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go: Option<VersionTuple>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionTuple {
    pub runtime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub lts: bool,
}

impl VersionTuple {
    fn to_core(&self, ecosystem: Ecosystem) -> VersionConfig {
        let mut config = VersionConfig::new(ecosystem, self.runtime.clone()).lts(self.lts);
        config.types_package = self.types_package.clone();
        config.build_tool = self.build_tool.clone();
        config.image = self.image.clone();
        config
    }
}

impl VersionsSection {
    pub fn to_core(&self) -> VersionsConfig {
        VersionsConfig {
            node: self.node.as_ref().map(|t| t.to_core(Ecosystem::Npm)),
            go: self.go.as_ref().map(|t| t.to_core(Ecosystem::Go)),
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the user config file and `.plumb.toml` are merged
    /// when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file.map(PathBuf::as_path), None)
    }

    /// Like [`Self::load`], with an explicit environment map instead of the
    /// process environment.
    pub fn load_from(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialise default settings")?;

        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder
                .add_source(
                    File::from(Self::config_path())
                        .format(FileFormat::Toml)
                        .required(false),
                )
                .add_source(
                    File::from(Path::new(LOCAL_CONFIG_FILE))
                        .format(FileFormat::Toml)
                        .required(false),
                ),
        };

        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("validation.disabled_rules")
            .with_list_parse_key("validation.ignore")
            .source(env);

        builder
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.plumb.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "plumb", "plumb")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Version tuples in core form, if any are configured.
    pub fn versions(&self) -> Option<VersionsConfig> {
        self.versions
            .as_ref()
            .map(VersionsSection::to_core)
            .filter(|v| !v.is_empty())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialise configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_back_up_and_compare_lexicographically() {
        let cfg = AppConfig::default();
        assert!(cfg.fix.backup);
        assert!(!cfg.fix.dry_run);
        assert_eq!(cfg.validation.comparison, ComparisonMode::Lexicographic);
        assert!(cfg.versions().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
[validation]
disabled_rules = ["license-required"]
comparison = "semantic"

[fix]
backup = false

[versions.node]
runtime = ">=20.0.0"
types_package = "^20.17.0"
image = "node:20-alpine"
lts = true
"#,
        );

        let cfg = AppConfig::load_from(Some(file.path()), env(&[])).unwrap();
        assert_eq!(cfg.validation.disabled_rules, ["license-required"]);
        assert_eq!(cfg.validation.comparison, ComparisonMode::Semantic);
        assert!(!cfg.fix.backup);
        assert_eq!(cfg.output.format, "human");

        let versions = cfg.versions().unwrap();
        let node = versions.node.unwrap();
        assert_eq!(node.ecosystem, Ecosystem::Npm);
        assert_eq!(node.types_package.as_deref(), Some("^20.17.0"));
        assert!(node.is_lts);
        assert!(versions.go.is_none());
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[fix]\nbackup = true\n");
        let cfg = AppConfig::load_from(
            Some(file.path()),
            env(&[
                ("PLUMB__FIX__BACKUP", "false"),
                ("PLUMB__VALIDATION__IGNORE", "dist,build"),
            ]),
        )
        .unwrap();
        assert!(!cfg.fix.backup);
        assert_eq!(cfg.validation.ignore, ["dist", "build"]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = AppConfig::load_from(Some(Path::new("/definitely/not/here.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("[fix\nbackup = ");
        assert!(AppConfig::load_from(Some(file.path()), env(&[])).is_err());
    }

    #[test]
    fn defaults_serialise_to_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        assert!(text.contains("[fix]"));
        assert!(text.contains("backup = true"));
        assert!(text.contains("comparison = \"lexicographic\""));
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
