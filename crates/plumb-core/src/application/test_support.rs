//! In-memory filesystem double for service tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::ApplicationError;
use crate::application::ports::Filesystem;
use crate::error::PlumbResult;

#[derive(Default)]
pub struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    modes: Mutex<HashMap<PathBuf, u32>>,
    read_only: Mutex<BTreeSet<PathBuf>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files.lock().unwrap().insert(path, content.to_string());
        self
    }

    pub fn with_mode(self, path: impl Into<PathBuf>, mode: u32) -> Self {
        self.modes.lock().unwrap().insert(path.into(), mode);
        self
    }

    /// Writes and copies to `path` fail.
    pub fn deny_writes(self, path: impl Into<PathBuf>) -> Self {
        self.read_only.lock().unwrap().insert(path.into());
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }

    fn add_parents(&self, path: &Path) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_writable(&self, path: &Path) -> PlumbResult<()> {
        if self.read_only.lock().unwrap().contains(path) {
            return Err(fs_error(path, "permission denied"));
        }
        Ok(())
    }
}

fn fs_error(path: &Path, reason: &str) -> crate::error::PlumbError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for FakeFs {
    fn read_to_string(&self, path: &Path) -> PlumbResult<String> {
        self.get(path).ok_or_else(|| fs_error(path, "not found"))
    }

    fn write_file(&self, path: &Path, content: &str) -> PlumbResult<()> {
        self.check_writable(path)?;
        self.add_parents(path);
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> PlumbResult<()> {
        self.add_parents(path);
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> PlumbResult<()> {
        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() && !self.exists(parent) {
                return Err(fs_error(to, "parent directory does not exist"));
            }
        }
        let content = self
            .files
            .lock()
            .unwrap()
            .remove(from)
            .ok_or_else(|| fs_error(from, "not found"))?;
        self.files.lock().unwrap().insert(to.to_path_buf(), content);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> PlumbResult<()> {
        self.check_writable(to)?;
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn list_files(&self, root: &Path, skip_dirs: &[String]) -> PlumbResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .filter(|p| {
                p.strip_prefix(root)
                    .map(|rel| {
                        rel.parent().is_none_or(|dir| {
                            !dir.components().any(|c| {
                                skip_dirs.iter().any(|s| c.as_os_str() == s.as_str())
                            })
                        })
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn mode(&self, path: &Path) -> Option<u32> {
        self.modes.lock().unwrap().get(path).copied()
    }
}
