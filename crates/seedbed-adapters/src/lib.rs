//! Infrastructure adapters for seedbed.
//!
//! Implements the ports in `seedbed_core::application::ports`: the local
//! and in-memory filesystems, subprocess-backed tool adapters, and a
//! scripted toolchain for tests.

pub mod filesystem;
pub mod process;
pub mod scripted;
pub mod tools;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use scripted::{ScriptedToolchain, ToolCall};
pub use tools::{ToolSettings, system_toolchain};
