use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use plumb_core::application::ports::ManifestParser;
use plumb_core::domain::{DependencyClass, DependencyRecord, Ecosystem};
use plumb_core::error::PlumbResult;

use super::{named, parse_error};

/// The dependency sections of a `package.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJsonParser;

impl ManifestParser for PackageJsonParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn matches(&self, path: &Path) -> bool {
        named(path, "package.json")
    }

    fn parse(&self, path: &Path, content: &str) -> PlumbResult<Vec<DependencyRecord>> {
        let manifest: PackageJson =
            serde_json::from_str(content).map_err(|e| parse_error(path, e.to_string()))?;

        let sections = [
            (manifest.dependencies, DependencyClass::Production),
            (manifest.dev_dependencies, DependencyClass::Development),
            (manifest.peer_dependencies, DependencyClass::Peer),
        ];
        Ok(sections
            .into_iter()
            .flat_map(|(deps, class)| {
                deps.into_iter().map(move |(name, version)| {
                    DependencyRecord::new(name, version, Ecosystem::Npm, class).source(path)
                })
            })
            .collect())
    }
}
