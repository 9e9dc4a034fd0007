use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// The directory every read and write is confined to.
///
/// Invariant: every path returned by [`ProjectRoot::resolve`] lies inside
/// the root. Resolution is lexical (`.` and `..` are folded without touching
/// the filesystem), so it also works for files that do not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    /// Relative roots are anchored at the current directory first, so `.`
    /// and `../sibling` name the directories a shell would.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let anchored = std::path::absolute(&root).unwrap_or(root);
        Self(normalize(&anchored))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve `path` (relative to the root, or absolute) and reject it if it
    /// escapes the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, DomainError> {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.0.join(path)
        };

        let resolved = try_normalize(&joined).ok_or_else(|| traversal(path))?;
        if resolved.starts_with(&self.0) {
            Ok(resolved)
        } else {
            Err(traversal(path))
        }
    }

    /// Whether `path` resolves inside the root.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).is_ok()
    }

    /// `path` relative to the root, or `path` unchanged if it lies outside.
    pub fn relativize(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.0)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// A new root nested inside this one.
    pub fn child(&self, path: impl AsRef<Path>) -> Result<Self, DomainError> {
        Ok(Self(self.resolve(path)?))
    }
}

impl AsRef<Path> for ProjectRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Lexically fold `.` and `..`. Leading `..` of a relative path are kept,
/// `..` at the filesystem root is a no-op, and an empty result is `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                out.pop();
                depth -= 1;
            }
            Component::ParentDir => {
                if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Like [`normalize`] but returns `None` when `..` climbs above the start.
fn try_normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                out.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

fn traversal(path: &Path) -> DomainError {
    DomainError::PathTraversal {
        path: path.display().to_string(),
    }
}

/// Append a suffix to the final component: `a/b.txt` + `.backup` → `a/b.txt.backup`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_paths_inside_root() {
        let root = ProjectRoot::new("/work/app");
        assert_eq!(
            root.resolve("src/./main.go").unwrap(),
            PathBuf::from("/work/app/src/main.go")
        );
        assert_eq!(
            root.resolve("src/../README.md").unwrap(),
            PathBuf::from("/work/app/README.md")
        );
    }

    #[test]
    fn rejects_traversal() {
        let root = ProjectRoot::new("/work/app");
        assert!(matches!(
            root.resolve("../other/secret"),
            Err(DomainError::PathTraversal { .. })
        ));
        assert!(root.resolve("/etc/passwd").is_err());
        assert!(root.resolve("/work/application").is_err());
    }

    #[test]
    fn accepts_absolute_paths_under_root() {
        let root = ProjectRoot::new("/work/app/");
        assert!(root.contains("/work/app/src/lib.rs"));
        assert!(root.contains("/work/app"));
    }

    #[test]
    fn relative_roots_are_anchored_at_the_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let root = ProjectRoot::new("./project");
        assert_eq!(root.as_path(), cwd.join("project"));
        assert_eq!(root.resolve("a/b.txt").unwrap(), cwd.join("project/a/b.txt"));
        assert!(root.resolve("../x").is_err());
    }

    #[test]
    fn dot_root_is_the_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(ProjectRoot::new(".").as_path(), cwd.as_path());
        assert_eq!(ProjectRoot::new("./").as_path(), cwd.as_path());
    }

    #[test]
    fn leading_parent_dir_climbs_from_the_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let parent = cwd.parent().unwrap_or(&cwd);
        assert_eq!(
            ProjectRoot::new("../sibling").as_path(),
            parent.join("sibling")
        );
    }

    #[test]
    fn normalize_keeps_leading_parent_dirs() {
        assert_eq!(normalize(Path::new("../a/./b/..")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("a/../..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new(".")), PathBuf::from("."));
        assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn relativize_strips_root() {
        let root = ProjectRoot::new("/work/app");
        assert_eq!(
            root.relativize(Path::new("/work/app/src/x.rs")),
            PathBuf::from("src/x.rs")
        );
    }

    #[test]
    fn suffix_is_appended_to_file_name() {
        assert_eq!(
            with_suffix(Path::new("dir/config.json"), ".backup"),
            PathBuf::from("dir/config.json.backup")
        );
    }
}
