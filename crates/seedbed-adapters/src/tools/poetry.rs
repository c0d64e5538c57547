use std::path::Path;

use seedbed_core::{
    application::ports::{DependencyManager, ToolResult},
    domain::{Dependency, DependencyGroup, ProjectConfig, RuntimeFamily, RuntimeVersion},
};
use tracing::instrument;

use crate::process::CommandRunner;

/// `poetry` as the Python dependency manager.
#[derive(Debug, Clone)]
pub struct PoetryManager {
    runner: CommandRunner,
}

impl PoetryManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::new(program),
        }
    }

    /// Arguments for `poetry add`; test deps go to the `test` group, a
    /// source selects an alternate package index.
    pub(crate) fn add_args(group: DependencyGroup, dependency: &Dependency) -> Vec<&str> {
        let mut args = vec!["add"];
        if group == DependencyGroup::Test {
            args.extend(["--group", "test"]);
        }
        if let Some(source) = dependency.source() {
            args.extend(["--source", source]);
        }
        args.push(dependency.name());
        args
    }
}

impl DependencyManager for PoetryManager {
    #[instrument(skip_all, fields(project = config.name()))]
    fn init_manifest(&self, root: &Path, config: &ProjectConfig) -> ToolResult {
        let python = config.runtime_version().constraint(RuntimeFamily::Python);
        self.runner.status(
            root,
            &[
                "init",
                "--no-interaction",
                "--name",
                config.name(),
                "--python",
                &python,
            ],
        )
    }

    fn use_runtime(&self, root: &Path, version: &RuntimeVersion) -> ToolResult {
        self.runner.status(root, &["env", "use", version.tag()])
    }

    fn add_dependency(
        &self,
        root: &Path,
        group: DependencyGroup,
        dependency: &Dependency,
    ) -> ToolResult {
        self.runner.status(root, &Self::add_args(group, dependency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_dependency_has_no_group_flag() {
        let dep = Dependency::new("numpy");
        assert_eq!(PoetryManager::add_args(DependencyGroup::Main, &dep), ["add", "numpy"]);
    }

    #[test]
    fn test_dependency_with_source() {
        let dep = Dependency::new("torch").with_source("pytorch_cpu");
        assert_eq!(
            PoetryManager::add_args(DependencyGroup::Test, &dep),
            ["add", "--group", "test", "--source", "pytorch_cpu", "torch"]
        );
    }
}
