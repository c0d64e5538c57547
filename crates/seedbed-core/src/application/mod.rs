//! Application layer for seedbed.
//!
//! - **Services**: the scaffold driver and the external tool orchestrator
//! - **Ports**: traits for the filesystem and each external tool
//! - **Report**: run state machine and the final `RunReport`
//!
//! Business rules (validation, planning, rendering) live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod report;
pub mod services;
pub mod step;

pub use services::{
    DependencyOutcome, ExternalToolOrchestrator, ScaffoldOptions, ScaffoldService, ToolOutcome,
};

pub use ports::{
    DependencyManager, Filesystem, HookManager, ToolFailure, ToolResult, Toolchain,
    VersionControl,
};

pub use error::ApplicationError;
pub use report::{RecoverableFailure, RunOutcome, RunReport, RunState, StepRecord, StepStatus};
pub use step::{FailureClass, ScaffoldStep, StepName};
