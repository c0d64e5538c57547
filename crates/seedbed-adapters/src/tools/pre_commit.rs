use std::path::Path;

use seedbed_core::application::ports::{HookManager, ToolResult};

use crate::process::CommandRunner;

/// `pre-commit` as the hook manager.
#[derive(Debug, Clone)]
pub struct PreCommitHooks {
    runner: CommandRunner,
}

impl PreCommitHooks {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::new(program),
        }
    }
}

impl HookManager for PreCommitHooks {
    fn install(&self, root: &Path, config_file: &Path) -> ToolResult {
        let config = config_file.to_string_lossy();
        self.runner.status(root, &["install", "--config", &config])
    }
}
