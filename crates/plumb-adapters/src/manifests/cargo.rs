use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use plumb_core::application::ports::ManifestParser;
use plumb_core::domain::{DependencyClass, DependencyRecord, Ecosystem};
use plumb_core::error::PlumbResult;

use super::{named, parse_error};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CargoManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, ::toml::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, ::toml::Value>,
    #[serde(default)]
    build_dependencies: BTreeMap<String, ::toml::Value>,
}

/// `Cargo.toml` dependency tables. Path, git and workspace-inherited
/// dependencies carry no registry version and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoManifestParser;

impl ManifestParser for CargoManifestParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn matches(&self, path: &Path) -> bool {
        named(path, "Cargo.toml")
    }

    fn parse(&self, path: &Path, content: &str) -> PlumbResult<Vec<DependencyRecord>> {
        let manifest: CargoManifest =
            ::toml::from_str(content).map_err(|e| parse_error(path, e.message().to_string()))?;

        let sections = [
            (manifest.dependencies, DependencyClass::Production),
            (manifest.dev_dependencies, DependencyClass::Development),
            (manifest.build_dependencies, DependencyClass::Development),
        ];
        let mut records = Vec::new();
        for (deps, class) in sections {
            for (name, spec) in deps {
                let version = match &spec {
                    ::toml::Value::String(version) => Some(version.as_str()),
                    ::toml::Value::Table(table) => table.get("version").and_then(|v| v.as_str()),
                    _ => None,
                };
                match version {
                    Some(version) => records.push(
                        DependencyRecord::new(name, version, Ecosystem::Cargo, class).source(path),
                    ),
                    None => debug!(dependency = %name, "No registry version; skipped"),
                }
            }
        }
        Ok(records)
    }
}
