use std::path::Path;

use seedbed_core::application::ports::{ToolResult, VersionControl};
use tracing::{debug, instrument};

use crate::process::CommandRunner;

/// `git` as the version control system.
#[derive(Debug, Clone)]
pub struct GitRepository {
    runner: CommandRunner,
    default_branch: String,
}

impl GitRepository {
    pub fn new(program: impl Into<String>, default_branch: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::new(program),
            default_branch: default_branch.into(),
        }
    }
}

impl VersionControl for GitRepository {
    fn is_repository(&self, root: &Path) -> bool {
        root.join(".git").exists()
    }

    #[instrument(skip(self), fields(branch = %self.default_branch))]
    fn init_repository(&self, root: &Path) -> ToolResult {
        let branch = format!("--initial-branch={}", self.default_branch);
        self.runner.status(root, &["init", &branch])
    }

    fn remote_url(&self, root: &Path, name: &str) -> Option<String> {
        self.runner
            .run(root, &["remote", "get-url", name])
            .ok()
            .filter(|url| !url.is_empty())
    }

    fn set_remote(&self, root: &Path, name: &str, url: &str) -> ToolResult {
        if self.remote_url(root, name).is_some() {
            debug!(remote = name, "remote exists, repointing");
            self.runner.status(root, &["remote", "set-url", name, url])
        } else {
            self.runner.status(root, &["remote", "add", name, url])
        }
    }

    /// Hooks were just installed and may not have their environments yet,
    /// so the commit skips them.
    fn commit_all(&self, root: &Path, message: &str) -> ToolResult {
        self.runner.status(root, &["add", "--all"])?;
        self.runner
            .status(root, &["commit", "--no-verify", "--message", message])
    }
}
