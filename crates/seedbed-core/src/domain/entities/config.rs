//! The validated project description.
//!
//! A [`ProjectConfig`] is only ever produced by
//! [`crate::domain::decode::project_config`], so holding one means every
//! field already passed validation. Nothing here is mutable after
//! construction.

use serde::Serialize;

use crate::domain::value_objects::{DependencyGroup, RuntimeFamily, RuntimeVersion};

/// Root entity: everything the engine needs to scaffold one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub(crate) name: String,
    pub(crate) version: String,
    pub(crate) runtime: RuntimeFamily,
    pub(crate) runtime_version: RuntimeVersion,
    pub(crate) dependencies: Dependencies,
    pub(crate) structure: Vec<DirectoryNode>,
    pub(crate) remote_url: Option<String>,
    pub(crate) options: ProjectOptions,
}

impl ProjectConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn runtime(&self) -> RuntimeFamily {
        self.runtime
    }

    pub fn runtime_version(&self) -> &RuntimeVersion {
        &self.runtime_version
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn structure(&self) -> &[DirectoryNode] {
        &self.structure
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    /// Manifest file name for this project's runtime family.
    pub fn manifest_file(&self) -> &'static str {
        self.runtime.manifest_file()
    }
}

/// Declared dependencies, split by manifest group, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependencies {
    pub(crate) main: Vec<Dependency>,
    pub(crate) test: Vec<Dependency>,
}

impl Dependencies {
    pub fn main(&self) -> &[Dependency] {
        &self.main
    }

    pub fn test(&self) -> &[Dependency] {
        &self.test
    }

    pub fn group(&self, group: DependencyGroup) -> &[Dependency] {
        match group {
            DependencyGroup::Main => &self.main,
            DependencyGroup::Test => &self.test,
        }
    }

    /// Every dependency paired with its group: main first, then test, each
    /// in declared order. This is the order adds are attempted in.
    pub fn iter(&self) -> impl Iterator<Item = (DependencyGroup, &Dependency)> {
        DependencyGroup::ALL
            .into_iter()
            .flat_map(move |g| self.group(g).iter().map(move |d| (g, d)))
    }

    /// Append `dependency` to `group` unless the group already names it.
    pub fn push(&mut self, group: DependencyGroup, dependency: Dependency) {
        if !self.contains(group, dependency.name()) {
            match group {
                DependencyGroup::Main => self.main.push(dependency),
                DependencyGroup::Test => self.test.push(dependency),
            }
        }
    }

    pub fn contains(&self, group: DependencyGroup, name: &str) -> bool {
        self.group(group).iter().any(|d| d.name() == name)
    }

    pub fn len(&self) -> usize {
        self.main.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One package requirement. The name is opaque to the engine: `numpy`,
/// `numpy>=1.26` and `@scope/pkg` are all passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub(crate) name: String,
    pub(crate) source: Option<String>,
}

impl Dependency {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternate package index to resolve this dependency from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// A declared directory and its declared subdirectories.
///
/// Children are owned; subtrees are never shared. A node without children is
/// a leaf *directory*, never a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryNode {
    pub(crate) name: String,
    pub(crate) children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: DirectoryNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[DirectoryNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Opt-in extras. Defaults leave every one of them off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectOptions {
    pub(crate) pin_runtime: bool,
    pub(crate) package_markers: bool,
    pub(crate) license: Option<License>,
    pub(crate) ci_runtime_versions: Vec<RuntimeVersion>,
    pub(crate) initial_commit: bool,
}

impl ProjectOptions {
    /// Bind the dependency manager's environment to the runtime version.
    pub fn pin_runtime(&self) -> bool {
        self.pin_runtime
    }

    /// Plant `__init__.py` under `src` (Python only).
    pub fn package_markers(&self) -> bool {
        self.package_markers
    }

    pub fn license(&self) -> Option<License> {
        self.license
    }

    /// Extra CI matrix entries beyond the configured runtime version.
    pub fn ci_runtime_versions(&self) -> &[RuntimeVersion] {
        &self.ci_runtime_versions
    }

    /// Stage and commit the scaffold once hooks are installed.
    pub fn initial_commit(&self) -> bool {
        self.initial_commit
    }
}

/// Licenses the engine can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum License {
    #[serde(rename = "MIT")]
    Mit,
}

impl License {
    pub const fn spdx(&self) -> &'static str {
        match self {
            Self::Mit => "MIT",
        }
    }
}
