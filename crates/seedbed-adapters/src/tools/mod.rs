//! Subprocess-backed tool adapters.

mod git;
mod npm;
mod poetry;
mod pre_commit;

pub use git::GitRepository;
pub use npm::NpmManager;
pub use poetry::PoetryManager;
pub use pre_commit::PreCommitHooks;

use serde::Deserialize;

use seedbed_core::{application::Toolchain, domain::RuntimeFamily};

/// Executable names and VCS defaults for the real toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub poetry: String,
    pub npm: String,
    pub git: String,
    pub pre_commit: String,
    pub default_branch: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            poetry: "poetry".into(),
            npm: "npm".into(),
            git: "git".into(),
            pre_commit: "pre-commit".into(),
            default_branch: "main".into(),
        }
    }
}

/// The subprocess toolchain for a runtime family.
pub fn system_toolchain(runtime: RuntimeFamily, settings: &ToolSettings) -> Toolchain {
    let dependencies: Box<dyn seedbed_core::application::DependencyManager> = match runtime {
        RuntimeFamily::Python => Box::new(PoetryManager::new(&settings.poetry)),
        RuntimeFamily::Node => Box::new(NpmManager::new(&settings.npm)),
    };
    Toolchain::new(
        dependencies,
        Box::new(GitRepository::new(&settings.git, &settings.default_branch)),
        Box::new(PreCommitHooks::new(&settings.pre_commit)),
    )
}
