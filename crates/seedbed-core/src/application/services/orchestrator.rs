//! External tool orchestration: dependency manager, VCS and hook manager.
//!
//! Each method wraps exactly one kind of tool call and classifies its
//! result by the failure class of the step it belongs to. The orchestrator
//! never decides to abort; it only reports. The driver acts on the outcome.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::application::{
    ports::{ToolResult, Toolchain},
    step::{FailureClass, ScaffoldStep, StepName},
};
use crate::domain::{Dependencies, DependencyGroup, ProjectConfig, RuntimeVersion};

/// Classified result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success,
    /// Prior work detected; nothing was invoked.
    Skipped,
    RecoverableFailure(String),
    FatalFailure(String),
}

impl ToolOutcome {
    pub fn classify(result: ToolResult, failure: FailureClass) -> Self {
        match (result, failure) {
            (Ok(()), _) => Self::Success,
            (Err(e), FailureClass::RecoverableSkip) => Self::RecoverableFailure(e.to_string()),
            (Err(e), FailureClass::Fatal) => Self::FatalFailure(e.to_string()),
        }
    }

    fn for_step(step: StepName, result: ToolResult) -> Self {
        Self::classify(result, ScaffoldStep::of(step).failure)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalFailure(_))
    }
}

/// Outcome of adding one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOutcome {
    pub group: DependencyGroup,
    pub name: String,
    pub outcome: ToolOutcome,
}

pub struct ExternalToolOrchestrator<'a> {
    tools: &'a Toolchain,
}

impl<'a> ExternalToolOrchestrator<'a> {
    pub fn new(tools: &'a Toolchain) -> Self {
        Self { tools }
    }

    /// Skipped when the manifest already exists.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn init_manifest(
        &self,
        root: &Path,
        config: &ProjectConfig,
        manifest_exists: bool,
    ) -> ToolOutcome {
        if manifest_exists {
            info!(manifest = config.manifest_file(), "manifest present, init skipped");
            return ToolOutcome::Skipped;
        }
        ToolOutcome::for_step(
            StepName::ManifestInit,
            self.tools.dependencies.init_manifest(root, config),
        )
    }

    #[instrument(skip_all, fields(version = %version))]
    pub fn pin_runtime(&self, root: &Path, version: &RuntimeVersion) -> ToolOutcome {
        ToolOutcome::for_step(
            StepName::RuntimePin,
            self.tools.dependencies.use_runtime(root, version),
        )
    }

    /// One call per declared dependency, `main` then `test`, declared order.
    /// A failed add never stops the remaining ones.
    #[instrument(skip_all, fields(count = dependencies.len()))]
    pub fn add_dependencies(
        &self,
        root: &Path,
        dependencies: &Dependencies,
    ) -> Vec<DependencyOutcome> {
        dependencies
            .iter()
            .map(|(group, dependency)| {
                debug!(group = %group, dependency = dependency.name(), "adding dependency");
                let outcome = ToolOutcome::for_step(
                    StepName::DependencyAdds,
                    self.tools.dependencies.add_dependency(root, group, dependency),
                );
                if let ToolOutcome::RecoverableFailure(reason) = &outcome {
                    warn!(group = %group, dependency = dependency.name(), %reason, "dependency add failed");
                }
                DependencyOutcome {
                    group,
                    name: dependency.name().to_string(),
                    outcome,
                }
            })
            .collect()
    }

    /// Skipped when `root` is already a repository.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn init_repository(&self, root: &Path) -> ToolOutcome {
        if self.tools.vcs.is_repository(root) {
            info!("repository present, init skipped");
            return ToolOutcome::Skipped;
        }
        ToolOutcome::for_step(StepName::VcsInit, self.tools.vcs.init_repository(root))
    }

    /// Exactly one set call. Repointing an existing remote is allowed but
    /// logged.
    #[instrument(skip_all, fields(remote = name))]
    pub fn set_remote(&self, root: &Path, name: &str, url: &str) -> ToolOutcome {
        match self.tools.vcs.remote_url(root, name) {
            Some(current) if current != url => {
                warn!(%current, new = url, "replacing existing remote URL");
            }
            Some(_) => debug!("remote already points at the configured URL"),
            None => {}
        }
        ToolOutcome::for_step(StepName::RemoteSet, self.tools.vcs.set_remote(root, name, url))
    }

    pub fn install_hooks(&self, root: &Path, config_file: &Path) -> ToolOutcome {
        ToolOutcome::for_step(
            StepName::HookInstall,
            self.tools.hooks.install(root, config_file),
        )
    }

    pub fn commit_all(&self, root: &Path, message: &str) -> ToolOutcome {
        ToolOutcome::for_step(
            StepName::InitialCommit,
            self.tools.vcs.commit_all(root, message),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use crate::application::ports::{
        MockDependencyManager, MockHookManager, MockVersionControl, ToolFailure,
    };
    use crate::domain::project_config;

    fn config(yaml: &str) -> ProjectConfig {
        project_config(&serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    fn toolchain(
        deps: MockDependencyManager,
        vcs: MockVersionControl,
        hooks: MockHookManager,
    ) -> Toolchain {
        Toolchain::new(Box::new(deps), Box::new(vcs), Box::new(hooks))
    }

    fn root() -> PathBuf {
        PathBuf::from("/work/demo")
    }

    #[test]
    fn adds_main_then_test_in_declared_order() {
        let cfg = config(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  main: [numpy, pandas, requests]\n  test: [pytest, coverage]",
        );
        let calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);

        let mut deps = MockDependencyManager::new();
        deps.expect_add_dependency()
            .times(5)
            .returning(move |_, group, dep| {
                log.lock().unwrap().push(format!("{group}:{}", dep.name()));
                Ok(())
            });

        let tools = toolchain(deps, MockVersionControl::new(), MockHookManager::new());
        let outcomes = ExternalToolOrchestrator::new(&tools).add_dependencies(&root(), cfg.dependencies());

        assert_eq!(
            *calls.lock().unwrap(),
            ["main:numpy", "main:pandas", "main:requests", "test:pytest", "test:coverage"]
        );
        assert!(outcomes.iter().all(|o| o.outcome == ToolOutcome::Success));
    }

    #[test]
    fn failed_add_is_recoverable_and_does_not_stop_the_rest() {
        let cfg = config(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  main: [numpy, pandas]\n  test: [pytest]",
        );
        let mut deps = MockDependencyManager::new();
        deps.expect_add_dependency()
            .times(3)
            .returning(|_, _, dep| {
                if dep.name() == "numpy" {
                    Err(ToolFailure::new("poetry add numpy", "exit status: 1"))
                } else {
                    Ok(())
                }
            });

        let tools = toolchain(deps, MockVersionControl::new(), MockHookManager::new());
        let outcomes = ExternalToolOrchestrator::new(&tools).add_dependencies(&root(), cfg.dependencies());

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0].outcome, ToolOutcome::RecoverableFailure(_)));
        assert_eq!(outcomes[0].name, "numpy");
        assert_eq!(outcomes[1].outcome, ToolOutcome::Success);
        assert_eq!(outcomes[2].group, DependencyGroup::Test);
    }

    #[test]
    fn manifest_init_skipped_when_present() {
        let cfg = config("name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"");
        let mut deps = MockDependencyManager::new();
        deps.expect_init_manifest().never();

        let tools = toolchain(deps, MockVersionControl::new(), MockHookManager::new());
        let outcome = ExternalToolOrchestrator::new(&tools).init_manifest(&root(), &cfg, true);
        assert_eq!(outcome, ToolOutcome::Skipped);
    }

    #[test]
    fn manifest_init_failure_is_fatal() {
        let cfg = config("name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"");
        let mut deps = MockDependencyManager::new();
        deps.expect_init_manifest()
            .withf(|root, cfg| root == Path::new("/work/demo") && cfg.name() == "demo")
            .times(1)
            .returning(|_, _| Err(ToolFailure::new("poetry init", "not found")));

        let tools = toolchain(deps, MockVersionControl::new(), MockHookManager::new());
        let outcome = ExternalToolOrchestrator::new(&tools).init_manifest(&root(), &cfg, false);
        assert!(outcome.is_fatal());
    }

    #[test]
    fn existing_repository_skips_init() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_repository().return_const(true);
        vcs.expect_init_repository().never();

        let tools = toolchain(MockDependencyManager::new(), vcs, MockHookManager::new());
        assert_eq!(
            ExternalToolOrchestrator::new(&tools).init_repository(&root()),
            ToolOutcome::Skipped
        );
    }

    #[test]
    fn repository_init_failure_is_fatal() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_repository().return_const(false);
        vcs.expect_init_repository()
            .times(1)
            .returning(|_| Err(ToolFailure::new("git init", "permission denied")));

        let tools = toolchain(MockDependencyManager::new(), vcs, MockHookManager::new());
        let outcome = ExternalToolOrchestrator::new(&tools).init_repository(&root());
        assert_eq!(
            outcome,
            ToolOutcome::FatalFailure("`git init` failed: permission denied".into())
        );
    }

    #[test]
    fn remote_overwrite_is_one_call_and_not_an_error() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_remote_url()
            .return_const(Some("https://old.example.com/demo.git".to_string()));
        vcs.expect_set_remote()
            .withf(|_, name, url| name == "origin" && url == "https://example.com/demo.git")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let tools = toolchain(MockDependencyManager::new(), vcs, MockHookManager::new());
        let outcome = ExternalToolOrchestrator::new(&tools).set_remote(
            &root(),
            "origin",
            "https://example.com/demo.git",
        );
        assert_eq!(outcome, ToolOutcome::Success);
    }

    #[test]
    fn hook_and_commit_failures_are_recoverable() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_commit_all()
            .returning(|_, _| Err(ToolFailure::new("git commit", "nothing to commit")));
        let mut hooks = MockHookManager::new();
        hooks
            .expect_install()
            .returning(|_, _| Err(ToolFailure::new("pre-commit install", "not found")));

        let tools = toolchain(MockDependencyManager::new(), vcs, hooks);
        let orchestrator = ExternalToolOrchestrator::new(&tools);
        assert!(matches!(
            orchestrator.install_hooks(&root(), Path::new(".pre-commit-config.yaml")),
            ToolOutcome::RecoverableFailure(_)
        ));
        assert!(matches!(
            orchestrator.commit_all(&root(), "Initial commit"),
            ToolOutcome::RecoverableFailure(_)
        ));
    }
}
