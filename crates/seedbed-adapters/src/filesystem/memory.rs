//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use seedbed_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{SeedbedError, SeedbedResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into
/// the service. Kind conflicts behave like a real disk: a directory cannot
/// be created over a file, nor a file written over a directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    writes: usize,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> SeedbedResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_poisoned())
    }

    fn write(&self) -> SeedbedResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_poisoned())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().ok()?.files.get(path.as_ref()).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All directories, sorted.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of `write_file` calls so far.
    pub fn write_count(&self) -> usize {
        self.read().map(|inner| inner.writes).unwrap_or_default()
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn seed_file(&self, path: impl AsRef<Path>, content: &str) -> SeedbedResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write()?
            .files
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> SeedbedResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(ApplicationError::PathConflict { path: current }.into());
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SeedbedResult<()> {
        let mut inner = self.write()?;

        if inner.directories.contains(path) {
            return Err(ApplicationError::PathConflict {
                path: path.to_path_buf(),
            }
            .into());
        }
        let orphan = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !inner.directories.contains(p));
        if orphan {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read().is_ok_and(|inner| inner.files.contains_key(path))
    }
}

fn lock_poisoned() -> SeedbedError {
    SeedbedError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_all_registers_every_ancestor() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/a/b")).unwrap();
        assert!(fs.is_dir(Path::new("/p")));
        assert!(fs.is_dir(Path::new("/p/a")));
        assert!(fs.is_dir(Path::new("/p/a/b")));
    }

    #[test]
    fn directory_over_file_conflicts() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/p/src", "not a dir").unwrap();
        let err = fs.create_dir_all(Path::new("/p/src/core")).unwrap_err();
        assert!(matches!(
            err,
            SeedbedError::Application(ApplicationError::PathConflict { .. })
        ));
    }

    #[test]
    fn file_over_directory_conflicts() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/README.md")).unwrap();
        assert!(fs.write_file(Path::new("/p/README.md"), "x").is_err());
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/nowhere/x"), "x").is_err());
        assert_eq!(fs.write_count(), 0);
    }
}
