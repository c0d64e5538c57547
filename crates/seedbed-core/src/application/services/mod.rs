//! Application services - orchestrate use cases.

pub mod orchestrator;
pub mod scaffold_service;

pub use orchestrator::{DependencyOutcome, ExternalToolOrchestrator, ToolOutcome};
pub use scaffold_service::{ScaffoldOptions, ScaffoldService};
