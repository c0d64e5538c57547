//! Run state and the final report.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::application::{ApplicationError, step::StepName};

/// Lifecycle of one run. Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
    Aborted,
}

impl RunState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }

    /// Validate and apply a transition.
    pub fn advance(&mut self, to: RunState) -> Result<(), ApplicationError> {
        let allowed = matches!(
            (*self, to),
            (Self::NotStarted, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Aborted)
        );
        if !allowed {
            return Err(ApplicationError::InvalidTransition {
                from: self.as_str(),
                to: to.as_str(),
            });
        }
        *self = to;
        Ok(())
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Done,
    Skipped,
    /// Finished with at least one recoverable failure.
    Degraded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: StepName,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A failure that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverableFailure {
    pub step: StepName,
    /// What the step was acting on: a dependency name, a remote, a hook file.
    pub subject: String,
    pub reason: String,
}

impl fmt::Display for RecoverableFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.step, self.subject, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RunOutcome {
    Completed,
    Aborted {
        step: StepName,
        #[serde(serialize_with = "as_display")]
        cause: ApplicationError,
    },
}

fn as_display<S: Serializer>(value: &ApplicationError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Everything that happened in one run, success or not.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub project: String,
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub state: RunState,
    pub outcome: RunOutcome,
    pub steps: Vec<StepRecord>,
    pub recoverable: Vec<RecoverableFailure>,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed)
    }

    /// The fatal error, when the run aborted.
    pub fn failure(&self) -> Option<(StepName, &ApplicationError)> {
        match &self.outcome {
            RunOutcome::Completed => None,
            RunOutcome::Aborted { step, cause } => Some((*step, cause)),
        }
    }

    pub fn step(&self, name: StepName) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.step == name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Mutable accumulator for a run in progress.
#[derive(Debug)]
pub(crate) struct RunRecorder {
    run_id: Uuid,
    project: String,
    root: PathBuf,
    started_at: DateTime<Utc>,
    state: RunState,
    steps: Vec<StepRecord>,
    recoverable: Vec<RecoverableFailure>,
}

impl RunRecorder {
    pub(crate) fn new(project: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            project: project.into(),
            root: root.into(),
            started_at: Utc::now(),
            state: RunState::NotStarted,
            steps: Vec::new(),
            recoverable: Vec::new(),
        }
    }

    pub(crate) fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub(crate) fn start(&mut self) -> Result<(), ApplicationError> {
        self.state.advance(RunState::Running)
    }

    pub(crate) fn record(&mut self, step: StepName, status: StepStatus, detail: Option<String>) {
        self.steps.push(StepRecord {
            step,
            status,
            detail,
        });
    }

    pub(crate) fn recoverable(
        &mut self,
        step: StepName,
        subject: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.recoverable.push(RecoverableFailure {
            step,
            subject: subject.into(),
            reason: reason.into(),
        });
    }

    pub(crate) fn complete(self) -> RunReport {
        self.finish(RunState::Completed, RunOutcome::Completed)
    }

    pub(crate) fn abort(mut self, step: StepName, cause: ApplicationError) -> RunReport {
        self.record(step, StepStatus::Failed, Some(cause.to_string()));
        self.finish(RunState::Aborted, RunOutcome::Aborted { step, cause })
    }

    fn finish(mut self, to: RunState, outcome: RunOutcome) -> RunReport {
        // Finishing a run that never started is reported as aborted.
        let outcome = match self.state.advance(to) {
            Ok(()) => outcome,
            Err(err) => {
                self.state = RunState::Aborted;
                RunOutcome::Aborted {
                    step: StepName::CreateDirectories,
                    cause: err,
                }
            }
        };
        RunReport {
            run_id: self.run_id,
            project: self.project,
            root: self.root,
            started_at: self.started_at,
            finished_at: Utc::now(),
            state: self.state,
            outcome,
            steps: self.steps,
            recoverable: self.recoverable,
        }
    }
}
