//! Scaffold Service - the run driver.
//!
//! A straight-line pipeline over injected ports:
//!
//! 1. Validate the configuration document
//! 2. Plan the directory tree
//! 3. Create directories, write generated files
//! 4. Manifest init, optional runtime pin, dependency adds
//! 5. VCS init, remote, hook installation, optional initial commit
//! 6. Emit the run report
//!
//! Nothing before step 3 touches the filesystem. After that, a fatal step
//! aborts the run and keeps whatever was already written.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_yaml::Value;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Toolchain},
        report::{RunRecorder, RunReport, StepStatus},
        services::orchestrator::{ExternalToolOrchestrator, ToolOutcome},
        step::{ScaffoldStep, StepName},
    },
    domain::{
        Artifact, FileSource, IdempotencyClass, PlannedFile, ProjectConfig, RenderContext,
        ScaffoldPlan, TreePlanner, manifest_skeleton, project_config,
    },
    error::{SeedbedError, SeedbedResult},
};

/// Run-level settings that do not belong in the project document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOptions {
    pub remote_name: String,
    pub commit_message: String,
    /// Fixed date for generated files; today when `None`.
    pub generated_on: Option<NaiveDate>,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            remote_name: "origin".into(),
            commit_message: "Initial commit".into(),
            generated_on: None,
        }
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    toolchain: Toolchain,
    options: ScaffoldOptions,
}

type StepResult<T = ()> = Result<T, (StepName, ApplicationError)>;

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = ScaffoldService::new(
    ///     Box::new(LocalFilesystem::new()),
    ///     Toolchain::new(Box::new(poetry), Box::new(git), Box::new(pre_commit)),
    /// );
    /// let report = service.scaffold_document(&document, "./projects")?;
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, toolchain: Toolchain) -> Self {
        Self {
            filesystem,
            toolchain,
            options: ScaffoldOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScaffoldOptions) -> Self {
        self.options = options;
        self
    }

    /// Decode and validate `document`, then plan it without touching disk.
    ///
    /// Needs no adapters, so a dry run can call it before any are built.
    pub fn plan_document(
        document: &Value,
        output_dir: impl AsRef<Path>,
    ) -> SeedbedResult<(ProjectConfig, ScaffoldPlan)> {
        let config = project_config(document)?;
        let plan = TreePlanner::plan(&config, output_dir.as_ref().join(config.name()));
        Ok((config, plan))
    }

    /// Validate `document` and run the full scaffold.
    ///
    /// Configuration errors come back as `Err` with nothing written. Every
    /// later failure is an `Aborted` report.
    pub fn scaffold_document(
        &self,
        document: &Value,
        output_dir: impl AsRef<Path>,
    ) -> SeedbedResult<RunReport> {
        let config = project_config(document).map_err(SeedbedError::Config)?;
        Ok(self.scaffold(&config, output_dir))
    }

    /// Scaffold a validated config under `output_dir/<name>`.
    #[instrument(
        skip_all,
        fields(project = %config.name(), output_dir = %output_dir.as_ref().display())
    )]
    pub fn scaffold(&self, config: &ProjectConfig, output_dir: impl AsRef<Path>) -> RunReport {
        let plan = TreePlanner::plan(config, output_dir.as_ref().join(config.name()));
        let mut run = RunRecorder::new(config.name(), plan.root());
        if let Err(err) = run.start() {
            return run.abort(StepName::CreateDirectories, err);
        }
        info!(run_id = %run.run_id(), root = %plan.root().display(), "scaffold started");

        match self.execute(config, &plan, &mut run) {
            Ok(()) => {
                let report = run.complete();
                info!(
                    recoverable = report.recoverable.len(),
                    "scaffold completed"
                );
                report
            }
            Err((step, cause)) => {
                warn!(step = %step, error = %cause, "scaffold aborted");
                run.abort(step, cause)
            }
        }
    }

    fn execute(
        &self,
        config: &ProjectConfig,
        plan: &ScaffoldPlan,
        run: &mut RunRecorder,
    ) -> StepResult {
        let ctx = match self.options.generated_on {
            Some(date) => RenderContext::with_date(config, date),
            None => RenderContext::new(config),
        };
        let orchestrator = ExternalToolOrchestrator::new(&self.toolchain);
        let root = plan.root();

        for step in ScaffoldStep::sequence(config) {
            match step.name {
                StepName::CreateDirectories => self.create_directories(plan, run)?,
                StepName::WriteFiles => self.write_files(plan, &ctx, run)?,
                StepName::ManifestInit => {
                    let manifest = Artifact::Manifest.file_path(config.runtime()).under(root);
                    let exists = self.filesystem.exists(&manifest);
                    let outcome = orchestrator.init_manifest(root, config, exists);
                    if outcome == ToolOutcome::Success {
                        self.write(&manifest, &manifest_skeleton(config))
                            .map_err(|e| (step.name, e))?;
                    }
                    Self::settle(run, step.name, config.manifest_file(), outcome)?;
                }
                StepName::RuntimePin => {
                    let outcome = orchestrator.pin_runtime(root, config.runtime_version());
                    Self::settle(run, step.name, config.runtime_version().as_str(), outcome)?;
                }
                StepName::DependencyAdds => {
                    let outcomes = orchestrator.add_dependencies(root, config.dependencies());
                    let total = outcomes.len();
                    let mut failed = 0;
                    for added in outcomes {
                        if let ToolOutcome::RecoverableFailure(reason) = added.outcome {
                            failed += 1;
                            run.recoverable(step.name, added.name, reason);
                        }
                    }
                    let status = match (total, failed) {
                        (0, _) => StepStatus::Skipped,
                        (_, 0) => StepStatus::Done,
                        _ => StepStatus::Degraded,
                    };
                    run.record(
                        step.name,
                        status,
                        Some(format!("{} of {total} added", total - failed)),
                    );
                }
                StepName::VcsInit => {
                    let outcome = orchestrator.init_repository(root);
                    Self::settle(run, step.name, "repository", outcome)?;
                }
                StepName::RemoteSet => {
                    if let Some(url) = config.remote_url() {
                        let outcome =
                            orchestrator.set_remote(root, &self.options.remote_name, url);
                        Self::settle(run, step.name, &self.options.remote_name, outcome)?;
                    }
                }
                StepName::HookInstall => {
                    let hook_file = Artifact::HookConfig.file_path(config.runtime());
                    let outcome = orchestrator.install_hooks(root, hook_file.as_path());
                    Self::settle(run, step.name, &hook_file.to_string(), outcome)?;
                }
                StepName::InitialCommit => {
                    let outcome = orchestrator.commit_all(root, &self.options.commit_message);
                    Self::settle(run, step.name, "HEAD", outcome)?;
                }
            }
        }
        Ok(())
    }

    /// Record a tool outcome; fatal ones end the run.
    fn settle(
        run: &mut RunRecorder,
        step: StepName,
        subject: &str,
        outcome: ToolOutcome,
    ) -> StepResult {
        match outcome {
            ToolOutcome::Success => run.record(step, StepStatus::Done, None),
            ToolOutcome::Skipped => {
                run.record(step, StepStatus::Skipped, Some("already present".into()));
            }
            ToolOutcome::RecoverableFailure(reason) => {
                warn!(step = %step, subject, %reason, "recoverable failure");
                run.record(step, StepStatus::Degraded, Some(reason.clone()));
                run.recoverable(step, subject, reason);
            }
            ToolOutcome::FatalFailure(reason) => {
                return Err((
                    step,
                    ApplicationError::ExternalToolFatal {
                        step: step.to_string(),
                        reason,
                    },
                ));
            }
        }
        Ok(())
    }

    /// Check the whole plan for kind conflicts, then create directories.
    fn create_directories(&self, plan: &ScaffoldPlan, run: &mut RunRecorder) -> StepResult {
        let step = StepName::CreateDirectories;
        let root = plan.root();

        for dir in plan.directories() {
            let path = dir.under(root);
            if self.filesystem.is_file(&path) {
                return Err((step, ApplicationError::PathConflict { path }));
            }
        }
        for file in plan.files() {
            let path = file.path.under(root);
            if self.filesystem.is_dir(&path) {
                return Err((step, ApplicationError::PathConflict { path }));
            }
        }

        let mut created = 0;
        for dir in plan.directories() {
            let path = dir.under(root);
            if self.filesystem.is_dir(&path) {
                continue;
            }
            self.filesystem
                .create_dir_all(&path)
                .map_err(|e| (step, Self::filesystem_error(&path, e)))?;
            created += 1;
        }

        run.record(
            step,
            StepStatus::Done,
            Some(format!("{created} created, {} present", plan.directories().len() - created)),
        );
        Ok(())
    }

    /// Write every planned file except the manifest, which belongs to
    /// manifest init.
    fn write_files(
        &self,
        plan: &ScaffoldPlan,
        ctx: &RenderContext<'_>,
        run: &mut RunRecorder,
    ) -> StepResult {
        let step = StepName::WriteFiles;
        let (mut written, mut kept) = (0, 0);

        for file in plan.files() {
            if file.source == FileSource::Artifact(Artifact::Manifest) {
                continue;
            }
            let path = file.path.under(plan.root());
            if file.policy == IdempotencyClass::CreateIfAbsent
                && self.filesystem.exists(&path)
            {
                kept += 1;
                continue;
            }
            self.write(&path, &Self::content(file, ctx))
                .map_err(|e| (step, e))?;
            written += 1;
        }

        run.record(
            step,
            StepStatus::Done,
            Some(format!("{written} written, {kept} kept")),
        );
        Ok(())
    }

    fn content(file: &PlannedFile, ctx: &RenderContext<'_>) -> String {
        match file.source {
            FileSource::Artifact(artifact) => artifact.render(ctx),
            FileSource::Placeholder => String::new(),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), ApplicationError> {
        self.filesystem
            .write_file(path, content)
            .map_err(|e| Self::filesystem_error(path, e))
    }

    fn filesystem_error(path: &Path, err: SeedbedError) -> ApplicationError {
        match err {
            SeedbedError::Application(app) => app,
            other => ApplicationError::FilesystemError {
                path: PathBuf::from(path),
                reason: other.to_string(),
            },
        }
    }
}
