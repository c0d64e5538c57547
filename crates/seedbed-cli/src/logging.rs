//! Diagnostics on stderr.
//!
//! The binary installs the one subscriber; the core and adapter crates only
//! emit events. `-q` drops to errors, each `-v` steps WARN → INFO → DEBUG →
//! TRACE, and a set `RUST_LOG` replaces the computed filter entirely.
//!
//! Stdout is reserved for the plan or run report, so nothing logged here
//! can corrupt `--output-format json`.

use std::io::IsTerminal as _;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events reach the terminal when `RUST_LOG` is unset.
const SEEDBED_TARGETS: [&str; 3] = ["seedbed", "seedbed_core", "seedbed_adapters"];

/// Install the stderr subscriber for this process.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = level_for(args);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    // Targets only help once tool invocations are being logged.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(level >= LevelFilter::DEBUG)
        .with_ansi(wants_ansi(args, std::io::stderr().is_terminal()))
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not install the log subscriber: {e}"))
}

fn level_for(args: &GlobalArgs) -> LevelFilter {
    match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// One `target=level` directive per seedbed crate, comma separated.
fn filter_directives(level: LevelFilter) -> String {
    SEEDBED_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Colour only on a terminal, and never when the user asked for plain
/// text by flag, environment or output format.
fn wants_ansi(args: &GlobalArgs, stderr_is_terminal: bool) -> bool {
    stderr_is_terminal && !args.no_color && args.output_format != OutputFormat::Plain
}
