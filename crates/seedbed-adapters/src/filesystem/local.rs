//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use seedbed_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{SeedbedError, SeedbedResult},
};
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SeedbedResult<()> {
        trace!(path = %path.display(), "create_dir_all");
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> SeedbedResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write_file");
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> SeedbedError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_kinds_of_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("a/b");
        fs.create_dir_all(&nested).unwrap();
        fs.write_file(&nested.join("x.txt"), "x").unwrap();

        assert!(fs.is_dir(&nested));
        assert!(fs.is_file(&nested.join("x.txt")));
        assert!(!fs.is_file(&nested));
        assert!(!fs.exists(&dir.path().join("missing")));
    }

    #[test]
    fn write_into_missing_parent_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&dir.path().join("nope/x.txt"), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            SeedbedError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
