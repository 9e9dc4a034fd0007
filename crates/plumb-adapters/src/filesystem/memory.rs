//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use plumb_core::application::{ApplicationError, ports::Filesystem};
use plumb_core::error::{PlumbError, PlumbResult};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to the engine and
/// inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    modes: HashMap<PathBuf, u32>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        // Seeding never observes a poisoned lock: nothing else holds it yet.
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
        self
    }

    /// Record permission bits for `path`.
    pub fn with_mode(self, path: impl AsRef<Path>, mode: u32) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.modes.insert(path.as_ref().to_path_buf(), mode);
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Every file and its content.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.inner
            .read()
            .map(|inner| inner.files.clone())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.modes.clear();
        }
    }

    fn read(&self) -> PlumbResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> PlumbResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> PlumbError {
    ApplicationError::LockPoisoned {
        resource: "memory filesystem",
    }
    .into()
}

fn not_found(path: &Path) -> PlumbError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "No such file".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> PlumbResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> PlumbResult<()> {
        let mut inner = self.write()?;
        if inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Is a directory".into(),
            }
            .into());
        }
        if let Some(parent) = path.parent() {
            inner.add_dirs(parent);
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> PlumbResult<()> {
        self.write()?.add_dirs(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn rename(&self, from: &Path, to: &Path) -> PlumbResult<()> {
        let mut inner = self.write()?;
        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: to.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }
        let content = inner.files.remove(from).ok_or_else(|| not_found(from))?;
        inner.files.insert(to.to_path_buf(), content);
        if let Some(mode) = inner.modes.remove(from) {
            inner.modes.insert(to.to_path_buf(), mode);
        }
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> PlumbResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn list_files(&self, root: &Path, skip_dirs: &[String]) -> PlumbResult<Vec<PathBuf>> {
        let inner = self.read()?;
        Ok(inner
            .files
            .keys()
            .filter(|path| {
                path.strip_prefix(root).is_ok_and(|rel| {
                    rel.parent().is_none_or(|dir| {
                        !dir
                            .components()
                            .any(|c| skip_dirs.iter().any(|s| c.as_os_str() == s.as_str()))
                    })
                })
            })
            .cloned()
            .collect())
    }

    fn mode(&self, path: &Path) -> Option<u32> {
        self.read().ok()?.modes.get(path).copied()
    }
}
