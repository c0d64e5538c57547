//! seedbed-core - hexagonal core of the seedbed project bootstrapper.
//!
//! Turns a declarative YAML project description into a ready-to-use project
//! tree: directories, a dependency manifest, ignore file, readme, container
//! file, commit-hook config and CI workflow, followed by dependency
//! installation and repository setup through external tools.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            seedbed-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │ (ScaffoldService, ToolOrchestrator)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, DependencyManager, VCS,    │
//! │  HookManager)                           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     seedbed-adapters (Infrastructure)   │
//! │ (LocalFilesystem, Poetry, Npm, Git, ...)│
//! └─────────────────────────────────────────┘
//!
//!   Domain layer (pure): decode, planner, render
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seedbed_core::prelude::*;
//!
//! let document: serde_yaml::Value = serde_yaml::from_str(&yaml)?;
//! let service = ScaffoldService::new(filesystem, toolchain);
//! let report = service.scaffold_document(&document, "./projects")?;
//! assert!(report.is_completed());
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ExternalToolOrchestrator, RunOutcome, RunReport, RunState, ScaffoldOptions,
        ScaffoldService, StepName, Toolchain,
        ports::{DependencyManager, Filesystem, HookManager, ToolFailure, ToolResult, VersionControl},
    };
    pub use crate::domain::{
        Artifact, ConfigError, Dependency, DependencyGroup, ProjectConfig, RenderContext,
        RuntimeFamily, RuntimeVersion, ScaffoldPlan, TreePlanner, project_config,
    };
    pub use crate::error::{SeedbedError, SeedbedResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
