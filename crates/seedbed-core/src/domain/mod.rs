//! Core domain layer for seedbed.
//!
//! Pure logic only: decoding and validating the configuration document,
//! planning the directory tree, and rendering generated files. All I/O and
//! every external tool sit behind the ports in `crate::application`.
//!
//! - **No I/O**: no filesystem, process or network access
//! - **Immutable entities**: a `ProjectConfig` never changes after decoding
//! - **Closed sets**: generated files are the `Artifact` enum

pub mod decode;
pub mod entities;
pub mod error;
pub mod planner;
pub mod render;
pub mod value_objects;

mod validation;

pub use entities::{
    artifact::Artifact,
    common::RelativePath,
    config::{Dependencies, Dependency, DirectoryNode, License, ProjectConfig, ProjectOptions},
    plan::{FileSource, PlannedFile, ScaffoldPlan},
};

pub use decode::project_config;
pub use error::ConfigError;
pub use planner::TreePlanner;
pub use render::{RenderContext, manifest_skeleton, render_manifest};
pub use validation::ConfigValidator;

pub use value_objects::{DependencyGroup, IdempotencyClass, RuntimeFamily, RuntimeVersion};
