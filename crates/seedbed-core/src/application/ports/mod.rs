//! Application ports (traits) for external dependencies.
//!
//! Driven ports only: the application calls them, `seedbed-adapters`
//! implements them. Each external tool gets its own narrow capability so a
//! fake can stand in for exactly one concern.
//!
//! - `Filesystem`: directory and file operations
//! - `DependencyManager`: manifest init, runtime pin, dependency adds
//! - `VersionControl`: repository init, remote, commit
//! - `HookManager`: commit-hook installation

use std::path::Path;

use thiserror::Error;

use crate::domain::{Dependency, DependencyGroup, ProjectConfig, RuntimeVersion};
use crate::error::SeedbedResult;

/// Result of one external tool invocation.
pub type ToolResult = Result<(), ToolFailure>;

/// An external command that could not be run or exited unsuccessfully.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("`{command}` failed: {reason}")]
pub struct ToolFailure {
    pub command: String,
    pub reason: String,
}

impl ToolFailure {
    pub fn new(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `seedbed_adapters::filesystem::LocalFilesystem` (production)
/// - `seedbed_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Nothing here deletes: a run only ever adds or rewrites.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Existing is fine.
    fn create_dir_all(&self, path: &Path) -> SeedbedResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> SeedbedResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;
}

/// Port for the runtime's dependency manager (`poetry`, `npm`).
#[cfg_attr(test, mockall::automock)]
pub trait DependencyManager: Send + Sync {
    /// Create a fresh manifest in `root`. Only called when none exists.
    fn init_manifest(&self, root: &Path, config: &ProjectConfig) -> ToolResult;

    /// Bind the project environment to a runtime version.
    fn use_runtime(&self, root: &Path, version: &RuntimeVersion) -> ToolResult;

    /// Add one dependency to a group. Re-adding a present one is a no-op.
    fn add_dependency(
        &self,
        root: &Path,
        group: DependencyGroup,
        dependency: &Dependency,
    ) -> ToolResult;
}

/// Port for the version control system (`git`).
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    fn is_repository(&self, root: &Path) -> bool;

    fn init_repository(&self, root: &Path) -> ToolResult;

    /// Current URL of a named remote, if configured.
    fn remote_url(&self, root: &Path, name: &str) -> Option<String>;

    /// Add the remote, or repoint it when it already exists.
    fn set_remote(&self, root: &Path, name: &str, url: &str) -> ToolResult;

    /// Stage everything and commit.
    fn commit_all(&self, root: &Path, message: &str) -> ToolResult;
}

/// Port for commit-hook installation (`pre-commit`).
#[cfg_attr(test, mockall::automock)]
pub trait HookManager: Send + Sync {
    fn install(&self, root: &Path, config_file: &Path) -> ToolResult;
}

/// The external tools one run talks to.
pub struct Toolchain {
    pub dependencies: Box<dyn DependencyManager>,
    pub vcs: Box<dyn VersionControl>,
    pub hooks: Box<dyn HookManager>,
}

impl Toolchain {
    pub fn new(
        dependencies: Box<dyn DependencyManager>,
        vcs: Box<dyn VersionControl>,
        hooks: Box<dyn HookManager>,
    ) -> Self {
        Self {
            dependencies,
            vcs,
            hooks,
        }
    }
}
