use std::path::Path;

use seedbed_core::{
    application::ports::{DependencyManager, ToolResult},
    domain::{Dependency, DependencyGroup, ProjectConfig, RuntimeFamily, RuntimeVersion},
};

use crate::process::CommandRunner;

/// `npm` as the Node dependency manager.
#[derive(Debug, Clone)]
pub struct NpmManager {
    runner: CommandRunner,
}

impl NpmManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::new(program),
        }
    }

    pub(crate) fn install_args(group: DependencyGroup, dependency: &Dependency) -> Vec<&str> {
        let mut args = vec!["install"];
        if group == DependencyGroup::Test {
            args.push("--save-dev");
        }
        if let Some(registry) = dependency.source() {
            args.extend(["--registry", registry]);
        }
        args.push(dependency.name());
        args
    }
}

impl DependencyManager for NpmManager {
    fn init_manifest(&self, root: &Path, _config: &ProjectConfig) -> ToolResult {
        self.runner.status(root, &["init", "-y"])
    }

    /// npm has no per-project interpreter; the closest thing is the
    /// `engines` constraint.
    fn use_runtime(&self, root: &Path, version: &RuntimeVersion) -> ToolResult {
        let engines = format!("engines.node={}", version.constraint(RuntimeFamily::Node));
        self.runner.status(root, &["pkg", "set", &engines])
    }

    fn add_dependency(
        &self,
        root: &Path,
        group: DependencyGroup,
        dependency: &Dependency,
    ) -> ToolResult {
        self.runner.status(root, &Self::install_args(group, dependency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_installs_as_dev_dependency() {
        let dep = Dependency::new("jest");
        assert_eq!(
            NpmManager::install_args(DependencyGroup::Test, &dep),
            ["install", "--save-dev", "jest"]
        );
        assert_eq!(
            NpmManager::install_args(DependencyGroup::Main, &Dependency::new("express")),
            ["install", "express"]
        );
    }
}
