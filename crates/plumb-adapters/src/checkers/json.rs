use std::path::Path;

use serde_json::Value;

use plumb_core::application::ports::SyntaxChecker;
use plumb_core::domain::{ConfigValidationResult, Severity, ValidationIssue};
use plumb_core::error::PlumbResult;

use super::file_name;

/// JSON syntax, plus required `package.json` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonChecker;

const PACKAGE_REQUIRED: [&str; 2] = ["name", "version"];

impl SyntaxChecker for JsonChecker {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supports(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "json")
    }

    fn validate(&self, path: &Path, content: &str) -> PlumbResult<ConfigValidationResult> {
        let value: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                let mut result = ConfigValidationResult::valid(0);
                result.push_error(
                    ValidationIssue::new("syntax", Severity::Error, format!("invalid JSON: {e}"))
                        .file(path)
                        .at(e.line().max(1), Some(e.column().max(1))),
                );
                return Ok(result);
            }
        };

        let Some(object) = value.as_object() else {
            return Ok(ConfigValidationResult::valid(0));
        };
        let mut result = ConfigValidationResult::valid(object.len());

        if file_name(path) == "package.json" {
            for field in PACKAGE_REQUIRED {
                if !object.get(field).is_some_and(Value::is_string) {
                    result.summary.missing_required += 1;
                    result.push_warning(
                        ValidationIssue::new(
                            "missing_field",
                            Severity::Warning,
                            format!("package.json has no \"{field}\" field"),
                        )
                        .file(path),
                    );
                }
            }
        }
        Ok(result)
    }
}
