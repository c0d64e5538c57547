//! A scripted stand-in for the external tools.
//!
//! Records every call in order and fails the ones a test names. Keeps just
//! enough state (initialized repositories, configured remotes) for re-runs
//! to behave like they would against real tools. With a filesystem attached
//! it also rewrites the manifest after each successful add, listing only
//! what was actually added.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use seedbed_core::{
    application::{
        Toolchain,
        ports::{
            DependencyManager, Filesystem, HookManager, ToolFailure, ToolResult, VersionControl,
        },
    },
    domain::{
        Dependencies, Dependency, DependencyGroup, ProjectConfig, RuntimeVersion, render_manifest,
    },
};

use crate::filesystem::MemoryFilesystem;

/// One recorded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    InitManifest { project: String },
    UseRuntime { version: String },
    AddDependency { group: DependencyGroup, name: String, source: Option<String> },
    InitRepository,
    SetRemote { name: String, url: String },
    InstallHooks { config_file: PathBuf },
    CommitAll { message: String },
}

impl fmt::Display for ToolCall {
    /// The label used to target failures, e.g. `add main numpy`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitManifest { .. } => f.write_str("init-manifest"),
            Self::UseRuntime { version } => write!(f, "use-runtime {version}"),
            Self::AddDependency { group, name, .. } => write!(f, "add {group} {name}"),
            Self::InitRepository => f.write_str("init-repository"),
            Self::SetRemote { name, .. } => write!(f, "set-remote {name}"),
            Self::InstallHooks { .. } => f.write_str("install-hooks"),
            Self::CommitAll { .. } => f.write_str("commit-all"),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<ToolCall>,
    failing: HashSet<String>,
    repositories: BTreeSet<PathBuf>,
    remotes: BTreeMap<(PathBuf, String), String>,
    manifests: BTreeMap<PathBuf, (ProjectConfig, Dependencies)>,
}

/// Handle shared by the three port implementations and the test.
#[derive(Debug, Clone, Default)]
pub struct ScriptedToolchain {
    script: Arc<Mutex<Script>>,
    filesystem: Option<MemoryFilesystem>,
}

impl ScriptedToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call whose label equals `label` fail.
    pub fn fail_on(self, label: impl Into<String>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.failing.insert(label.into());
        }
        self
    }

    /// Pretend `root` already holds a repository.
    pub fn with_repository(self, root: impl Into<PathBuf>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.repositories.insert(root.into());
        }
        self
    }

    /// Keep the manifest on `fs` in step with successful adds.
    pub fn with_filesystem(mut self, fs: &MemoryFilesystem) -> Self {
        self.filesystem = Some(fs.clone());
        self
    }

    /// Boxed ports sharing this script.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(
            Box::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.script
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, predicate: impl Fn(&ToolCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    pub fn remote(&self, root: &Path, name: &str) -> Option<String> {
        self.script
            .lock()
            .ok()?
            .remotes
            .get(&(root.to_path_buf(), name.to_string()))
            .cloned()
    }

    /// Record `call`, then fail it if scripted to; otherwise apply `effect`.
    fn invoke(&self, call: ToolCall, effect: impl FnOnce(&mut Script)) -> ToolResult {
        let label = call.to_string();
        let mut script = self
            .script
            .lock()
            .map_err(|_| ToolFailure::new(&label, "script lock poisoned"))?;
        script.calls.push(call);
        if script.failing.contains(&label) {
            return Err(ToolFailure::new(label, "scripted failure"));
        }
        effect(&mut script);
        Ok(())
    }
}

impl DependencyManager for ScriptedToolchain {
    fn init_manifest(&self, root: &Path, config: &ProjectConfig) -> ToolResult {
        let entry = (config.clone(), Dependencies::default());
        self.invoke(
            ToolCall::InitManifest {
                project: config.name().to_string(),
            },
            |s| {
                s.manifests.insert(root.to_path_buf(), entry);
            },
        )
    }

    fn use_runtime(&self, _root: &Path, version: &RuntimeVersion) -> ToolResult {
        self.invoke(
            ToolCall::UseRuntime {
                version: version.to_string(),
            },
            |_| {},
        )
    }

    fn add_dependency(
        &self,
        root: &Path,
        group: DependencyGroup,
        dependency: &Dependency,
    ) -> ToolResult {
        let label = format!("add {group} {}", dependency.name());
        let mut manifest = None;
        self.invoke(
            ToolCall::AddDependency {
                group,
                name: dependency.name().to_string(),
                source: dependency.source().map(str::to_string),
            },
            |s| {
                if let Some((config, added)) = s.manifests.get_mut(root) {
                    added.push(group, dependency.clone());
                    manifest = Some((
                        root.join(config.manifest_file()),
                        render_manifest(config, added),
                    ));
                }
            },
        )?;

        match (&self.filesystem, manifest) {
            (Some(fs), Some((path, content))) => fs
                .write_file(&path, &content)
                .map_err(|e| ToolFailure::new(label, e.to_string())),
            _ => Ok(()),
        }
    }
}

impl VersionControl for ScriptedToolchain {
    fn is_repository(&self, root: &Path) -> bool {
        self.script
            .lock()
            .is_ok_and(|s| s.repositories.contains(root))
    }

    fn init_repository(&self, root: &Path) -> ToolResult {
        let root = root.to_path_buf();
        self.invoke(ToolCall::InitRepository, |s| {
            s.repositories.insert(root);
        })
    }

    fn remote_url(&self, root: &Path, name: &str) -> Option<String> {
        self.remote(root, name)
    }

    fn set_remote(&self, root: &Path, name: &str, url: &str) -> ToolResult {
        let key = (root.to_path_buf(), name.to_string());
        let url = url.to_string();
        self.invoke(
            ToolCall::SetRemote {
                name: name.to_string(),
                url: url.clone(),
            },
            |s| {
                s.remotes.insert(key, url);
            },
        )
    }

    fn commit_all(&self, _root: &Path, message: &str) -> ToolResult {
        self.invoke(
            ToolCall::CommitAll {
                message: message.to_string(),
            },
            |_| {},
        )
    }
}

impl HookManager for ScriptedToolchain {
    fn install(&self, _root: &Path, config_file: &Path) -> ToolResult {
        self.invoke(
            ToolCall::InstallHooks {
                config_file: config_file.to_path_buf(),
            },
            |_| {},
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_failure_is_recorded_then_returned() {
        let tools = ScriptedToolchain::new().fail_on("add main numpy");
        let root = Path::new("/p");
        assert!(tools
            .add_dependency(root, DependencyGroup::Main, &Dependency::new("numpy"))
            .is_err());
        assert!(tools
            .add_dependency(root, DependencyGroup::Main, &Dependency::new("pandas"))
            .is_ok());
        assert_eq!(tools.calls().len(), 2);
    }

    #[test]
    fn manifest_lists_only_successful_adds() {
        let document: serde_yaml::Value =
            serde_yaml::from_str("name: demo\nversion: \"0.1.0\"\nruntimeVersion: \"3.9\"")
                .unwrap();
        let config = seedbed_core::domain::project_config(&document).unwrap();
        let fs = MemoryFilesystem::new();
        let tools = ScriptedToolchain::new()
            .fail_on("add main numpy")
            .with_filesystem(&fs);
        let root = Path::new("/p");

        tools.init_manifest(root, &config).unwrap();
        let _ = tools.add_dependency(root, DependencyGroup::Main, &Dependency::new("numpy"));
        tools
            .add_dependency(root, DependencyGroup::Test, &Dependency::new("pytest"))
            .unwrap();

        let manifest = fs.read_file("/p/pyproject.toml").unwrap();
        assert!(manifest.contains("pytest"));
        assert!(!manifest.contains("numpy"));
    }

    #[test]
    fn repository_state_survives_between_calls() {
        let tools = ScriptedToolchain::new();
        let root = Path::new("/p");
        assert!(!tools.is_repository(root));
        tools.init_repository(root).unwrap();
        assert!(tools.is_repository(root));

        tools.set_remote(root, "origin", "https://example.com/p.git").unwrap();
        assert_eq!(
            tools.remote_url(root, "origin").as_deref(),
            Some("https://example.com/p.git")
        );
    }
}
