//! Application settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI owns it; the core crate only sees the pieces handed to it
//! ([`ScaffoldOptions`], [`ToolSettings`]).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `SEEDBED_*` environment variables, `__` separating sections
//!    (`SEEDBED_VCS__REMOTE_NAME=upstream`)
//! 3. The settings file: `--config FILE`, else the platform config dir
//! 4. Built-in defaults

use std::path::PathBuf;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use seedbed_adapters::ToolSettings;
use seedbed_core::application::ScaffoldOptions;

const ENV_PREFIX: &str = "SEEDBED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Executables for the external tools.
    pub tools: ToolsConfig,
    pub vcs: VcsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub poetry: String,
    pub npm: String,
    pub git: String,
    pub pre_commit: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            poetry: "poetry".into(),
            npm: "npm".into(),
            git: "git".into(),
            pre_commit: "pre-commit".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    pub remote_name: String,
    pub default_branch: String,
    pub commit_message: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            remote_name: "origin".into(),
            default_branch: "main".into(),
            commit_message: "Initial commit".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load settings from file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::from(Self::config_path()).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|settings| settings.try_deserialize::<Self>())
            .with_context(|| match config_file {
                Some(path) => format!("failed to load settings from {}", path.display()),
                None => "failed to load settings".to_owned(),
            })
    }

    /// Path to the default settings file.
    ///
    /// Uses `directories::ProjectDirs` for the platform config dir, falling
    /// back to `.seedbed.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "seedbed", "seedbed")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".seedbed.toml"))
    }

    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings {
            poetry: self.tools.poetry.clone(),
            npm: self.tools.npm.clone(),
            git: self.tools.git.clone(),
            pre_commit: self.tools.pre_commit.clone(),
            default_branch: self.vcs.default_branch.clone(),
        }
    }

    pub fn scaffold_options(&self) -> ScaffoldOptions {
        ScaffoldOptions {
            remote_name: self.vcs.remote_name.clone(),
            commit_message: self.vcs.commit_message.clone(),
            ..ScaffoldOptions::default()
        }
    }
}
