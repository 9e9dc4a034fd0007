//! Leaf syntax checkers for configuration files.
//!
//! Each checker parses one file format and reports problems as issues;
//! none of them fail outright on bad input.

mod env;
mod json;
mod toml;

use std::path::Path;
use std::sync::Arc;

use plumb_core::application::ports::SyntaxChecker;

pub use env::EnvChecker;
pub use json::JsonChecker;
pub use toml::TomlChecker;

/// Every built-in checker.
pub fn builtin_checkers() -> Vec<Arc<dyn SyntaxChecker>> {
    vec![
        Arc::new(JsonChecker),
        Arc::new(TomlChecker),
        Arc::new(EnvChecker),
    ]
}

/// 1-based line and column of a byte offset.
pub(crate) fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

pub(crate) fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let content = "ab\ncd\nef";
        assert_eq!(line_col(content, 0), (1, 1));
        assert_eq!(line_col(content, 4), (2, 2));
        assert_eq!(line_col(content, 100), (3, 3));
    }
}
