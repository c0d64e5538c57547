//! The fixed step sequence of a scaffold run.

use std::fmt;

use serde::Serialize;

use crate::domain::{IdempotencyClass, ProjectConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepName {
    CreateDirectories,
    WriteFiles,
    ManifestInit,
    RuntimePin,
    DependencyAdds,
    VcsInit,
    RemoteSet,
    HookInstall,
    InitialCommit,
}

impl StepName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateDirectories => "create-directories",
            Self::WriteFiles => "write-files",
            Self::ManifestInit => "manifest-init",
            Self::RuntimePin => "runtime-pin",
            Self::DependencyAdds => "dependency-adds",
            Self::VcsInit => "vcs-init",
            Self::RemoteSet => "remote-set",
            Self::HookInstall => "hook-install",
            Self::InitialCommit => "initial-commit",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failed step does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureClass {
    /// Abort the run; earlier work is kept.
    Fatal,
    /// Record the failure and continue.
    RecoverableSkip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldStep {
    pub name: StepName,
    pub idempotency: IdempotencyClass,
    pub failure: FailureClass,
}

impl ScaffoldStep {
    pub const fn of(name: StepName) -> Self {
        use FailureClass::*;
        use IdempotencyClass::*;

        let (idempotency, failure) = match name {
            StepName::CreateDirectories => (CreateIfAbsent, Fatal),
            StepName::WriteFiles => (Overwrite, Fatal),
            StepName::ManifestInit => (CreateIfAbsent, Fatal),
            StepName::RuntimePin => (ExternalCall, RecoverableSkip),
            StepName::DependencyAdds => (ExternalCall, RecoverableSkip),
            StepName::VcsInit => (CreateIfAbsent, Fatal),
            StepName::RemoteSet => (ExternalCall, RecoverableSkip),
            StepName::HookInstall => (ExternalCall, RecoverableSkip),
            StepName::InitialCommit => (ExternalCall, RecoverableSkip),
        };
        Self {
            name,
            idempotency,
            failure,
        }
    }

    /// Steps for one run of `config`, in execution order. Opt-in steps are
    /// present only when enabled.
    pub fn sequence(config: &ProjectConfig) -> Vec<ScaffoldStep> {
        let options = config.options();
        [
            Some(StepName::CreateDirectories),
            Some(StepName::WriteFiles),
            Some(StepName::ManifestInit),
            options.pin_runtime().then_some(StepName::RuntimePin),
            Some(StepName::DependencyAdds),
            Some(StepName::VcsInit),
            config.remote_url().map(|_| StepName::RemoteSet),
            Some(StepName::HookInstall),
            options.initial_commit().then_some(StepName::InitialCommit),
        ]
        .into_iter()
        .flatten()
        .map(Self::of)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project_config;

    fn config(yaml: &str) -> ProjectConfig {
        project_config(&serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn minimal_sequence_has_no_opt_in_steps() {
        let steps = ScaffoldStep::sequence(&config("name: a\nversion: \"1\"\nruntimeVersion: \"3.9\""));
        let names: Vec<_> = steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                StepName::CreateDirectories,
                StepName::WriteFiles,
                StepName::ManifestInit,
                StepName::DependencyAdds,
                StepName::VcsInit,
                StepName::HookInstall,
            ]
        );
    }

    #[test]
    fn remote_and_options_add_steps_in_place() {
        let steps = ScaffoldStep::sequence(&config(
            "name: a\nversion: \"1\"\nruntimeVersion: \"3.9\"\nremoteUrl: https://example.com/a.git\noptions:\n  pinRuntime: true\n  initialCommit: true",
        ));
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "create-directories",
                "write-files",
                "manifest-init",
                "runtime-pin",
                "dependency-adds",
                "vcs-init",
                "remote-set",
                "hook-install",
                "initial-commit",
            ]
        );
    }

    #[test]
    fn only_init_steps_are_fatal() {
        let fatal: Vec<_> = [
            StepName::ManifestInit,
            StepName::VcsInit,
            StepName::DependencyAdds,
            StepName::RemoteSet,
            StepName::HookInstall,
        ]
        .into_iter()
        .filter(|n| ScaffoldStep::of(*n).failure == FailureClass::Fatal)
        .collect();
        assert_eq!(fatal, [StepName::ManifestInit, StepName::VcsInit]);
    }
}
