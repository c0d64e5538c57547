pub mod artifact;
pub mod common;
pub mod config;
pub mod plan;

pub use artifact::Artifact;
pub use config::ProjectConfig;
pub use plan::ScaffoldPlan;
