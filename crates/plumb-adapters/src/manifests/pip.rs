use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use plumb_core::application::ports::ManifestParser;
use plumb_core::domain::{DependencyClass, DependencyRecord, Ecosystem};
use plumb_core::error::PlumbResult;

use super::parse_error;

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*(.*)$")
        .expect("requirement pattern is valid")
});

/// `requirements*.txt` files. Options (`-r`, `-e`, `--index-url`) are
/// skipped; an unpinned requirement is recorded as `*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementsParser;

impl ManifestParser for RequirementsParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pip
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("requirements") && n.ends_with(".txt"))
    }

    fn parse(&self, path: &Path, content: &str) -> PlumbResult<Vec<DependencyRecord>> {
        let class = if path.to_string_lossy().contains("dev") {
            DependencyClass::Development
        } else {
            DependencyClass::Production
        };

        let mut records = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default();
            // Environment markers follow ';'.
            let line = line.split(';').next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with('-') {
                continue;
            }
            let caps = REQUIREMENT.captures(line).ok_or_else(|| {
                parse_error(path, format!("line {}: cannot read requirement '{line}'", index + 1))
            })?;
            let name = &caps[1];
            let version = caps[2].trim();
            let version = if version.is_empty() { "*" } else { version };
            records.push(DependencyRecord::new(name, version, Ecosystem::Pip, class).source(path));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pins_ranges_and_extras() {
        let content = "\
# web deps
-r base.txt
requests==2.28.0
uvicorn[standard]>=0.20,<1.0
flask
django>=4.2 ; python_version >= \"3.8\"
";
        let records = RequirementsParser
            .parse(Path::new("requirements.txt"), content)
            .unwrap();
        let pairs: Vec<_> = records
            .iter()
            .map(|r| (r.name.as_str(), r.declared_version.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("requests", "==2.28.0"),
                ("uvicorn", ">=0.20,<1.0"),
                ("flask", "*"),
                ("django", ">=4.2"),
            ]
        );
    }

    #[test]
    fn dev_requirements_are_development() {
        let records = RequirementsParser
            .parse(Path::new("requirements-dev.txt"), "pytest==8.0.0\n")
            .unwrap();
        assert_eq!(records[0].class, DependencyClass::Development);
        assert!(RequirementsParser.matches(Path::new("requirements-dev.txt")));
        assert!(!RequirementsParser.matches(Path::new("README.txt")));
    }

    #[test]
    fn unreadable_requirement_is_an_error() {
        assert!(
            RequirementsParser
                .parse(Path::new("requirements.txt"), "!!!\n")
                .is_err()
        );
    }
}
