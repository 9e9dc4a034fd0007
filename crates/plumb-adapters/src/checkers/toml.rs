use std::path::Path;

use plumb_core::application::ports::SyntaxChecker;
use plumb_core::domain::{ConfigValidationResult, Severity, ValidationIssue};
use plumb_core::error::PlumbResult;

use super::{file_name, line_col};

/// TOML syntax, plus the `Cargo.toml` package/workspace table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlChecker;

impl SyntaxChecker for TomlChecker {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn supports(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "toml")
    }

    fn validate(&self, path: &Path, content: &str) -> PlumbResult<ConfigValidationResult> {
        let table = match content.parse::<::toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                let (line, column) = e
                    .span()
                    .map_or((1, 1), |span| line_col(content, span.start));
                let mut result = ConfigValidationResult::valid(0);
                result.push_error(
                    ValidationIssue::new(
                        "syntax",
                        Severity::Error,
                        format!("invalid TOML: {}", e.message()),
                    )
                    .file(path)
                    .at(line, Some(column)),
                );
                return Ok(result);
            }
        };

        let mut result = ConfigValidationResult::valid(table.len());
        if file_name(path) == "Cargo.toml"
            && !table.contains_key("package")
            && !table.contains_key("workspace")
        {
            result.summary.missing_required += 1;
            result.push_warning(
                ValidationIssue::new(
                    "missing_field",
                    Severity::Warning,
                    "Cargo.toml has neither a [package] nor a [workspace] table",
                )
                .file(path),
            );
        }
        Ok(result)
    }
}
