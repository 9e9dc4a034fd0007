//! Fix strategies: turning one issue into one [`Fix`].
//!
//! Dispatch is a closed enum. The registry maps rule ids to strategies and
//! keeps an ordered list of message-keyword fallbacks for issues whose rule
//! has no strategy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::application::ApplicationError;
use crate::domain::rule::ids;
use crate::domain::{Fix, FixAction, ValidationIssue};

/// Owner-only mode suggested for key material.
const PRIVATE_KEY_MODE: &str = "600";

const TEMPLATE_SUFFIX: &str = ".tmpl";

const GITIGNORE: &str = "\
# Dependencies
node_modules/
vendor/

# Build output
dist/
build/
target/

# Environment
.env
.env.local

# Editors and OS
.idea/
.vscode/
.DS_Store
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixStrategy {
    CreateReadme,
    CreateLicense,
    CreateGitignore,
    CreateMissingFile,
    RenameFixNaming,
    AddTemplateExtension,
    NormalizePermissions,
}

impl FixStrategy {
    pub const ALL: [FixStrategy; 7] = [
        Self::CreateReadme,
        Self::CreateLicense,
        Self::CreateGitignore,
        Self::CreateMissingFile,
        Self::RenameFixNaming,
        Self::AddTemplateExtension,
        Self::NormalizePermissions,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateReadme => "create-readme",
            Self::CreateLicense => "create-license",
            Self::CreateGitignore => "create-gitignore",
            Self::CreateMissingFile => "create-missing-file",
            Self::RenameFixNaming => "rename-fix-naming",
            Self::AddTemplateExtension => "add-template-extension",
            Self::NormalizePermissions => "normalize-permissions",
        }
    }

    /// Build a fix for `issue`. `Ok(None)` means the strategy declines.
    pub fn build(&self, issue: &ValidationIssue) -> Result<Option<Fix>, ApplicationError> {
        let fix = match self {
            Self::CreateReadme => Some(
                Fix::create("README.md", readme_content(&issue.file))
                    .description("Create a README.md"),
            ),
            Self::CreateLicense => {
                Some(Fix::create("LICENSE", mit_license()).description("Create an MIT LICENSE"))
            }
            Self::CreateGitignore => {
                Some(Fix::create(".gitignore", GITIGNORE).description("Create a .gitignore"))
            }
            Self::CreateMissingFile => non_empty(&issue.file).map(|file| {
                Fix::create(file, "").description(format!("Create {}", file.display()))
            }),
            Self::RenameFixNaming => self.rename_without_spaces(&issue.file)?,
            Self::AddTemplateExtension => non_empty(&issue.file)
                .filter(|file| !file.to_string_lossy().ends_with(TEMPLATE_SUFFIX))
                .map(|file| {
                    let mut destination = file.to_string_lossy().into_owned();
                    destination.push_str(TEMPLATE_SUFFIX);
                    Fix::rename(file, destination.clone())
                        .description(format!("Rename {} to {destination}", file.display()))
                }),
            Self::NormalizePermissions => non_empty(&issue.file).map(|file| {
                Fix::new(
                    "normalize_permissions",
                    FixAction::Permissions,
                    file,
                    PRIVATE_KEY_MODE,
                )
                .description(format!("chmod {PRIVATE_KEY_MODE} {}", file.display()))
            }),
        };
        Ok(fix)
    }

    fn rename_without_spaces(&self, file: &Path) -> Result<Option<Fix>, ApplicationError> {
        let Some(file) = non_empty(file) else {
            return Ok(None);
        };
        let name = file
            .file_name()
            .ok_or_else(|| ApplicationError::StrategyFailed {
                strategy: self.name(),
                reason: format!("{} has no file name", file.display()),
            })?
            .to_string_lossy();
        if !name.contains(' ') {
            return Ok(None);
        }
        let renamed = name.replace(' ', "_");
        let destination: PathBuf = file.with_file_name(&renamed);
        Ok(Some(
            Fix::rename(file, destination.to_string_lossy().into_owned())
                .description(format!("Rename '{name}' to '{renamed}'")),
        ))
    }
}

impl std::fmt::Display for FixStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn non_empty(path: &Path) -> Option<&Path> {
    (!path.as_os_str().is_empty()).then_some(path)
}

fn readme_content(issue_file: &Path) -> String {
    let title = issue_file
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Project".to_string());
    format!("# {title}\n\n## Getting started\n\nDescribe how to build and run the project.\n")
}

fn mit_license() -> String {
    let year = chrono::Utc::now().year();
    format!(
        "MIT License\n\nCopyright (c) {year} The project authors\n\n\
         Permission is hereby granted, free of charge, to any person obtaining a copy\n\
         of this software and associated documentation files (the \"Software\"), to deal\n\
         in the Software without restriction, including without limitation the rights\n\
         to use, copy, modify, merge, publish, distribute, sublicense, and/or sell\n\
         copies of the Software, and to permit persons to whom the Software is\n\
         furnished to do so, subject to the following conditions:\n\n\
         The above copyright notice and this permission notice shall be included in all\n\
         copies or substantial portions of the Software.\n\n\
         THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\n\
         IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\n\
         FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\n\
         AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\n\
         LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\n\
         OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE\n\
         SOFTWARE.\n"
    )
}

/// Keyword fallback: every keyword must appear in the lowercased message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub keywords: &'static [&'static str],
    pub strategy: FixStrategy,
}

impl Fallback {
    pub fn matches(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.keywords.iter().all(|k| message.contains(k))
    }
}

const DEFAULT_FALLBACKS: [Fallback; 4] = [
    Fallback {
        keywords: &["missing", "file"],
        strategy: FixStrategy::CreateMissingFile,
    },
    Fallback {
        keywords: &["space", "name"],
        strategy: FixStrategy::RenameFixNaming,
    },
    Fallback {
        keywords: &["template", "extension"],
        strategy: FixStrategy::AddTemplateExtension,
    },
    Fallback {
        keywords: &["permission"],
        strategy: FixStrategy::NormalizePermissions,
    },
];

/// Rule-id to strategy table plus ordered fallbacks.
#[derive(Debug, Clone)]
pub struct FixStrategyRegistry {
    entries: Vec<(String, FixStrategy)>,
    by_rule: HashMap<String, usize>,
    fallbacks: Vec<Fallback>,
}

impl Default for FixStrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FixStrategyRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            by_rule: HashMap::new(),
            fallbacks: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.entries = vec![
            (ids::README_REQUIRED.into(), FixStrategy::CreateReadme),
            (ids::LICENSE_REQUIRED.into(), FixStrategy::CreateLicense),
            (ids::GITIGNORE_RECOMMENDED.into(), FixStrategy::CreateGitignore),
            (ids::NAMING_CONVENTIONS.into(), FixStrategy::RenameFixNaming),
            (ids::TEMPLATE_EXTENSION.into(), FixStrategy::AddTemplateExtension),
            (ids::FILE_PERMISSIONS.into(), FixStrategy::NormalizePermissions),
        ];
        registry.fallbacks = DEFAULT_FALLBACKS.to_vec();
        registry.rebuild_index();
        registry
    }

    /// Map `rule_id` to `strategy`, replacing any previous mapping.
    pub fn register(&mut self, rule_id: impl Into<String>, strategy: FixStrategy) {
        let rule_id = rule_id.into();
        self.entries.retain(|(id, _)| *id != rule_id);
        self.entries.push((rule_id, strategy));
        self.rebuild_index();
    }

    pub fn unregister(&mut self, rule_id: &str) -> Option<FixStrategy> {
        let index = *self.by_rule.get(rule_id)?;
        let (_, strategy) = self.entries.remove(index);
        self.rebuild_index();
        Some(strategy)
    }

    pub fn get(&self, rule_id: &str) -> Option<FixStrategy> {
        self.by_rule.get(rule_id).map(|&i| self.entries[i].1)
    }

    pub fn entries(&self) -> &[(String, FixStrategy)] {
        &self.entries
    }

    pub fn fallbacks(&self) -> &[Fallback] {
        &self.fallbacks
    }

    pub fn push_fallback(&mut self, fallback: Fallback) {
        self.fallbacks.push(fallback);
    }

    /// First fallback whose keywords all appear in `message`.
    pub fn fallback_for(&self, message: &str) -> Option<FixStrategy> {
        self.fallbacks
            .iter()
            .find(|f| f.matches(message))
            .map(|f| f.strategy)
    }

    /// Strategy for `issue`: by rule id first, then by message.
    pub fn resolve(&self, issue: &ValidationIssue) -> Option<FixStrategy> {
        issue
            .rule_id
            .as_deref()
            .and_then(|id| self.get(id))
            .or_else(|| self.fallback_for(&issue.message))
    }

    fn rebuild_index(&mut self) {
        self.by_rule = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;

    fn issue(rule: Option<&str>, message: &str, file: &str) -> ValidationIssue {
        let issue = ValidationIssue::new("test", Severity::Warning, message)
            .file(file)
            .fixable(true);
        match rule {
            Some(rule) => issue.rule(rule),
            None => issue,
        }
    }

    #[test]
    fn rule_id_wins_over_message() {
        let registry = FixStrategyRegistry::with_defaults();
        let i = issue(Some(ids::README_REQUIRED), "missing file README.md", "README.md");
        assert_eq!(registry.resolve(&i), Some(FixStrategy::CreateReadme));
    }

    #[test]
    fn fallbacks_are_ordered() {
        let registry = FixStrategyRegistry::with_defaults();
        assert_eq!(
            registry.fallback_for("Missing required file docs/CHANGELOG.md"),
            Some(FixStrategy::CreateMissingFile)
        );
        assert_eq!(
            registry.fallback_for("file name contains a space"),
            Some(FixStrategy::RenameFixNaming)
        );
        assert_eq!(
            registry.fallback_for("Template file lacks the template extension"),
            Some(FixStrategy::AddTemplateExtension)
        );
        assert_eq!(registry.fallback_for("something else"), None);
    }

    #[test]
    fn unknown_rule_falls_back_to_message() {
        let registry = FixStrategyRegistry::with_defaults();
        let i = issue(Some("custom"), "overly broad permissions on key.pem", "key.pem");
        assert_eq!(registry.resolve(&i), Some(FixStrategy::NormalizePermissions));
    }

    #[test]
    fn register_replaces_and_unregister_reindexes() {
        let mut registry = FixStrategyRegistry::with_defaults();
        registry.register(ids::README_REQUIRED, FixStrategy::CreateMissingFile);
        assert_eq!(
            registry.get(ids::README_REQUIRED),
            Some(FixStrategy::CreateMissingFile)
        );
        assert_eq!(registry.entries().len(), 6);

        assert_eq!(
            registry.unregister(ids::LICENSE_REQUIRED),
            Some(FixStrategy::CreateLicense)
        );
        assert_eq!(registry.get(ids::LICENSE_REQUIRED), None);
        assert_eq!(
            registry.get(ids::NAMING_CONVENTIONS),
            Some(FixStrategy::RenameFixNaming)
        );
    }

    #[test]
    fn rename_replaces_spaces_in_file_name_only() {
        let fix = FixStrategy::RenameFixNaming
            .build(&issue(None, "", "my dir/my file.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(fix.action, FixAction::Rename);
        assert_eq!(fix.content, "my dir/my_file.txt");
    }

    #[test]
    fn rename_declines_without_spaces() {
        let fix = FixStrategy::RenameFixNaming
            .build(&issue(None, "", "fine.txt"))
            .unwrap();
        assert!(fix.is_none());
    }

    #[test]
    fn template_extension_is_appended_once() {
        let fix = FixStrategy::AddTemplateExtension
            .build(&issue(None, "", "templates/main.go"))
            .unwrap()
            .unwrap();
        assert_eq!(fix.content, "templates/main.go.tmpl");
        assert!(
            FixStrategy::AddTemplateExtension
                .build(&issue(None, "", "templates/main.go.tmpl"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn permission_fix_is_manual() {
        let fix = FixStrategy::NormalizePermissions
            .build(&issue(None, "", "certs/server.key"))
            .unwrap()
            .unwrap();
        assert_eq!(fix.action, FixAction::Permissions);
        assert_eq!(fix.content, "600");
        assert!(!fix.automatic);
    }

    #[test]
    fn generic_create_declines_without_file() {
        assert!(
            FixStrategy::CreateMissingFile
                .build(&issue(None, "missing file", ""))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn license_carries_current_year() {
        let fix = FixStrategy::CreateLicense
            .build(&issue(None, "", ""))
            .unwrap()
            .unwrap();
        assert!(fix.content.contains(&chrono::Utc::now().year().to_string()));
        assert_eq!(fix.target, PathBuf::from("LICENSE"));
    }
}
