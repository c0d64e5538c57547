//! The scaffold command: read the description, then plan or run it.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, info, instrument};

use seedbed_adapters::{LocalFilesystem, system_toolchain};
use seedbed_core::application::ScaffoldService;

use crate::{
    cli::{OutputFormat, RunArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(document = %args.document.display(), dry_run = args.dry_run))]
pub fn execute(args: RunArgs, config: AppConfig, output: &OutputManager) -> CliResult<()> {
    let document = read_document(&args.document)?;
    let (project, plan) = ScaffoldService::plan_document(&document, &args.output_dir)?;
    debug!(project = %project.name(), runtime = %project.runtime(), "description validated");

    if args.dry_run {
        return match output.format() {
            OutputFormat::Json => Ok(output.json(&plan)?),
            _ => output
                .plan(&plan)
                .with_cli_context(|| "writing the plan"),
        };
    }

    let toolchain = system_toolchain(project.runtime(), &config.tool_settings());
    let service = ScaffoldService::new(Box::new(LocalFilesystem::new()), toolchain)
        .with_options(config.scaffold_options());

    let report = service.scaffold(&project, &args.output_dir);
    match output.format() {
        OutputFormat::Json => output.json(&report)?,
        _ => output
            .report(&report)
            .with_cli_context(|| "writing the run report")?,
    }

    match report.failure() {
        None => {
            info!(run_id = %report.run_id, "project created");
            Ok(())
        }
        Some((step, cause)) => Err(CliError::Aborted {
            step,
            cause: cause.clone(),
        }),
    }
}

/// Read and parse the YAML description. No schema checks here.
fn read_document(path: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadDocument {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| CliError::ParseDocument {
        path: path.to_path_buf(),
        source,
    })
}
