//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, help
//! text and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "seedbed",
    bin_name = "seedbed",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Bootstrap a project from a YAML description",
    long_about = "Seedbed reads a project description (name, runtime, dependencies, \
                  directory layout) and creates the project: directories, starter \
                  files, dependency manifest, git repository and pre-commit hooks.",
    after_help = "EXAMPLES:\n\
        \x20 seedbed project.yaml\n\
        \x20 seedbed project.yaml --output-dir ~/src\n\
        \x20 seedbed project.yaml --dry-run\n\
        \x20 seedbed project.yaml --output-format json > report.json",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Flags that shape logging and output.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

/// What to scaffold and where.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Project description document.
    #[arg(value_name = "CONFIG", help = "Path to the YAML project description")]
    pub document: PathBuf,

    /// Parent directory; the project lands in `<DIR>/<name>`.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = ".",
        help = "Directory to create the project in"
    )]
    pub output_dir: PathBuf,

    /// Validate and print the plan without writing anything.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}
