use std::path::Path;

use plumb_core::application::ports::ManifestParser;
use plumb_core::domain::{DependencyClass, DependencyRecord, Ecosystem};
use plumb_core::error::PlumbResult;

use super::{named, parse_error};

/// `go.mod` `require` directives, single-line and block form.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModParser;

impl ManifestParser for GoModParser {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn matches(&self, path: &Path) -> bool {
        named(path, "go.mod")
    }

    fn parse(&self, path: &Path, content: &str) -> PlumbResult<Vec<DependencyRecord>> {
        let mut records = Vec::new();
        let mut in_require = false;

        for (index, raw) in content.lines().enumerate() {
            let (code, comment) = match raw.split_once("//") {
                Some((code, comment)) => (code.trim(), comment.trim()),
                None => (raw.trim(), ""),
            };
            if code.is_empty() {
                continue;
            }

            let spec = if in_require {
                if code == ")" {
                    in_require = false;
                    continue;
                }
                code
            } else if let Some(rest) = code.strip_prefix("require") {
                let rest = rest.trim();
                if rest == "(" {
                    in_require = true;
                    continue;
                }
                rest
            } else {
                continue;
            };

            let mut parts = spec.split_whitespace();
            let (Some(module), Some(version)) = (parts.next(), parts.next()) else {
                return Err(parse_error(
                    path,
                    format!("line {}: require needs a module path and a version", index + 1),
                ));
            };
            let class = if comment == "indirect" {
                DependencyClass::Indirect
            } else {
                DependencyClass::Production
            };
            records.push(DependencyRecord::new(module, version, Ecosystem::Go, class).source(path));
        }

        if in_require {
            return Err(parse_error(path, "unterminated require block"));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_MOD: &str = "module example.com/api

go 1.22

require github.com/google/uuid v1.6.0

require (
\tgithub.com/gin-gonic/gin v1.9.0
\tgolang.org/x/net v0.17.0 // indirect
)

replace example.com/old => ../old
";

    #[test]
    fn reads_single_and_block_requires() {
        let records = GoModParser.parse(Path::new("go.mod"), GO_MOD).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["github.com/google/uuid", "github.com/gin-gonic/gin", "golang.org/x/net"]
        );
        assert_eq!(records[1].declared_version, "v1.9.0");
        assert_eq!(records[2].class, DependencyClass::Indirect);
        assert_eq!(records[0].class, DependencyClass::Production);
    }

    #[test]
    fn missing_version_is_an_error() {
        let err = GoModParser
            .parse(Path::new("go.mod"), "require (\n\tgithub.com/x/y\n)\n")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        assert!(
            GoModParser
                .parse(Path::new("go.mod"), "require (\n\tgithub.com/x/y v1.0.0\n")
                .is_err()
        );
    }
}
