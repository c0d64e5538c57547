//! Output management and formatting.
//!
//! Human and plain output go through [`console::Term`]; the JSON format
//! prints one serialized document to stdout and nothing else.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use seedbed_core::{
    application::{RunOutcome, RunReport, StepStatus},
    domain::{FileSource, ScaffoldPlan},
};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`. Not suppressed in quiet mode; errors
    /// must always be visible.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Indented detail line under a step.
    pub fn detail(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("    {msg}")
        } else {
            format!("    {}", msg.dimmed())
        };
        self.term.write_line(&line)
    }

    /// Pretty-printed JSON on stdout. Ignores `--quiet`: the document is the
    /// whole output.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<(), serde_json::Error> {
        let text = serde_json::to_string_pretty(value)?;
        self.term.write_line(&text).map_err(serde_json::Error::io)
    }

    /// Render a dry-run plan.
    pub fn plan(&self, plan: &ScaffoldPlan) -> io::Result<()> {
        self.header(&format!("Plan for {}", plan.root().display()))?;
        for dir in plan.directories() {
            self.print(&format!("  {dir}/"))?;
        }
        for file in plan.files() {
            let origin = match &file.source {
                FileSource::Artifact(artifact) => artifact.to_string(),
                FileSource::Placeholder => "empty".to_owned(),
            };
            self.print(&format!("  {}  ({origin})", file.path))?;
        }
        self.info(&format!(
            "{} entries, nothing written (dry run)",
            plan.entry_count()
        ))
    }

    /// Render a finished run, one line per step and one per recoverable failure.
    pub fn report(&self, report: &RunReport) -> io::Result<()> {
        self.header(&format!(
            "{} -> {}",
            report.project,
            report.root().display()
        ))?;
        for record in &report.steps {
            let line = match &record.detail {
                Some(detail) => format!("{} ({detail})", record.step),
                None => record.step.to_string(),
            };
            match record.status {
                StepStatus::Done => self.success(&line)?,
                StepStatus::Skipped => self.detail(&format!("- {line} skipped"))?,
                StepStatus::Degraded => self.warning(&line)?,
                StepStatus::Failed => self.error(&line)?,
            }
        }
        for failure in &report.recoverable {
            self.warning(&failure.to_string())?;
        }
        match &report.outcome {
            RunOutcome::Completed if report.recoverable.is_empty() => {
                self.success(&format!("{} is ready", report.project))
            }
            RunOutcome::Completed => self.warning(&format!(
                "{} is ready with {} recoverable failure(s)",
                report.project,
                report.recoverable.len()
            )),
            RunOutcome::Aborted { step, .. } => {
                self.error(&format!("run aborted at {step}"))
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
