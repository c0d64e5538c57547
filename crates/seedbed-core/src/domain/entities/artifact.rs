//! Generated files as a closed set of variants.
//!
//! Adding a new generated file means adding a variant here, an arm in
//! `file_path`/`write_policy`, and a renderer arm in `domain::render`.
//! Nothing in the planner or the driver branches on config keys.

use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::common::RelativePath,
    render::{self, RenderContext},
    value_objects::{IdempotencyClass, RuntimeFamily},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Artifact {
    Manifest,
    IgnoreFile,
    Readme,
    ContainerFile,
    HookConfig,
    CiWorkflow,
    License,
}

impl Artifact {
    /// Files every scaffold gets, in write order.
    pub const REQUIRED: [Artifact; 6] = [
        Self::Manifest,
        Self::IgnoreFile,
        Self::Readme,
        Self::ContainerFile,
        Self::HookConfig,
        Self::CiWorkflow,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::IgnoreFile => "ignore-file",
            Self::Readme => "readme",
            Self::ContainerFile => "container-file",
            Self::HookConfig => "hook-config",
            Self::CiWorkflow => "ci-workflow",
            Self::License => "license",
        }
    }

    /// Location relative to the project root.
    pub fn file_path(&self, runtime: RuntimeFamily) -> RelativePath {
        RelativePath::from_static(match self {
            Self::Manifest => runtime.manifest_file(),
            Self::IgnoreFile => ".gitignore",
            Self::Readme => "README.md",
            Self::ContainerFile => "Dockerfile",
            Self::HookConfig => ".pre-commit-config.yaml",
            Self::CiWorkflow => ".github/workflows/ci.yml",
            Self::License => "LICENSE",
        })
    }

    /// Manifest, readme and license are owned by the user (or the dependency
    /// manager) after the first run; the rest are regenerated verbatim.
    pub const fn write_policy(&self) -> IdempotencyClass {
        match self {
            Self::Manifest | Self::Readme | Self::License => IdempotencyClass::CreateIfAbsent,
            Self::IgnoreFile | Self::ContainerFile | Self::HookConfig | Self::CiWorkflow => {
                IdempotencyClass::Overwrite
            }
        }
    }

    /// Produce the file content. Infallible for a validated config.
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        render::render_artifact(*self, ctx)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_path_follows_runtime() {
        assert_eq!(
            Artifact::Manifest.file_path(RuntimeFamily::Python).to_string(),
            "pyproject.toml"
        );
        assert_eq!(
            Artifact::Manifest.file_path(RuntimeFamily::Node).to_string(),
            "package.json"
        );
    }

    #[test]
    fn ci_workflow_is_nested() {
        let path = Artifact::CiWorkflow.file_path(RuntimeFamily::Python);
        assert_eq!(path.to_string(), ".github/workflows/ci.yml");
    }

    #[test]
    fn user_owned_files_are_create_if_absent() {
        assert_eq!(Artifact::Manifest.write_policy(), IdempotencyClass::CreateIfAbsent);
        assert_eq!(Artifact::Readme.write_policy(), IdempotencyClass::CreateIfAbsent);
        assert_eq!(Artifact::CiWorkflow.write_policy(), IdempotencyClass::Overwrite);
    }
}
