use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    entities::{artifact::Artifact, common::RelativePath},
    value_objects::IdempotencyClass,
};

/// Ordered filesystem operations for one scaffold run.
///
/// Pure data: the planner builds it, the driver executes it. Directories
/// are listed parents-first; files come after every directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldPlan {
    pub(crate) root: PathBuf,
    pub(crate) directories: Vec<RelativePath>,
    pub(crate) files: Vec<PlannedFile>,
}

impl ScaffoldPlan {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories to ensure, the project root (`.`) first.
    pub fn directories(&self) -> &[RelativePath] {
        &self.directories
    }

    pub fn files(&self) -> &[PlannedFile] {
        &self.files
    }

    pub fn contains_directory(&self, path: &RelativePath) -> bool {
        self.directories.contains(path)
    }

    pub fn entry_count(&self) -> usize {
        self.directories.len() + self.files.len()
    }
}

/// A file the run will write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub path: RelativePath,
    pub source: FileSource,
    pub policy: IdempotencyClass,
}

impl PlannedFile {
    pub(crate) fn artifact(artifact: Artifact, path: RelativePath) -> Self {
        Self {
            path,
            source: FileSource::Artifact(artifact),
            policy: artifact.write_policy(),
        }
    }

    pub(crate) fn placeholder(path: RelativePath) -> Self {
        Self {
            path,
            source: FileSource::Placeholder,
            policy: IdempotencyClass::CreateIfAbsent,
        }
    }
}

/// Where a planned file's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "artifact")]
pub enum FileSource {
    Artifact(Artifact),
    /// Empty marker file such as `__init__.py`.
    Placeholder,
}
