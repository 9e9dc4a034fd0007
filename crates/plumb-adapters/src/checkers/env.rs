use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use plumb_core::application::ports::SyntaxChecker;
use plumb_core::domain::{ConfigValidationResult, Severity, ValidationIssue};
use plumb_core::error::PlumbResult;

use super::file_name;

static ENV_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("env key pattern is valid"));

/// `.env` files: `KEY=VALUE` lines, comments and blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvChecker;

impl SyntaxChecker for EnvChecker {
    fn name(&self) -> &'static str {
        "env"
    }

    fn supports(&self, path: &Path) -> bool {
        let name = file_name(path);
        name == ".env" || name.starts_with(".env.") || name.ends_with(".env")
    }

    fn validate(&self, path: &Path, content: &str) -> PlumbResult<ConfigValidationResult> {
        let mut result = ConfigValidationResult::valid(0);
        let mut seen = HashSet::new();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            result.summary.total_properties += 1;

            let Some((key, value)) = line.split_once('=') else {
                result.push_error(
                    ValidationIssue::new(
                        "syntax",
                        Severity::Error,
                        format!("expected KEY=VALUE, found '{line}'"),
                    )
                    .file(path)
                    .at(line_no, None),
                );
                continue;
            };
            let key = key.trim();

            if !ENV_KEY.is_match(key) {
                result.push_error(
                    ValidationIssue::new(
                        "syntax",
                        Severity::Error,
                        format!("invalid variable name '{key}'"),
                    )
                    .file(path)
                    .at(line_no, Some(1)),
                );
                continue;
            }
            if let Some(quote) = unterminated_quote(value.trim()) {
                result.push_error(
                    ValidationIssue::new(
                        "syntax",
                        Severity::Error,
                        format!("unterminated {quote} quote in value of {key}"),
                    )
                    .file(path)
                    .at(line_no, None),
                );
                continue;
            }
            if !seen.insert(key.to_string()) {
                result.push_warning(
                    ValidationIssue::new(
                        "duplicate_key",
                        Severity::Warning,
                        format!("{key} is defined more than once"),
                    )
                    .file(path)
                    .at(line_no, Some(1)),
                );
                continue;
            }
            result.summary.valid_properties += 1;
        }
        Ok(result)
    }
}

fn unterminated_quote(value: &str) -> Option<char> {
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if value.len() < 2 || !value.ends_with(quote) {
        Some(quote)
    } else {
        None
    }
}
