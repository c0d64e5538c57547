//! Domain value objects: RuntimeFamily, RuntimeVersion, DependencyGroup,
//! IdempotencyClass.
//!
//! These are pure value types with equality-by-value and no identity. Each
//! owns its string representation and its `FromStr` parser.

use crate::domain::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── RuntimeFamily ─────────────────────────────────────────────────────────────

/// The language runtime a project targets.
///
/// Selects the manifest format, the dependency manager adapter, the ignore
/// list, the hook pipeline, the container base image and the CI setup step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeFamily {
    #[default]
    Python,
    Node,
}

impl RuntimeFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Node => "node",
        }
    }

    /// File name of the dependency manifest at the project root.
    pub const fn manifest_file(&self) -> &'static str {
        match self {
            Self::Python => "pyproject.toml",
            Self::Node => "package.json",
        }
    }
}

impl fmt::Display for RuntimeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "node" | "nodejs" | "javascript" | "js" => Ok(Self::Node),
            other => Err(ConfigError::invalid(
                "runtime",
                format!("unknown runtime family '{other}' (expected python or node)"),
            )),
        }
    }
}

// ── RuntimeVersion ────────────────────────────────────────────────────────────

/// Runtime version constraint exactly as the user wrote it.
///
/// The engine never interprets it beyond deriving two display forms: a
/// manifest constraint and a bare version usable as an image tag or CI
/// matrix entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeVersion(String);

impl RuntimeVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Manifest constraint: a bare version gets the family's range operator
    /// (`^3.9` for poetry, `>=18` for npm engines); anything already carrying
    /// an operator passes through untouched.
    pub fn constraint(&self, family: RuntimeFamily) -> String {
        if !self.0.starts_with(|c: char| c.is_ascii_digit()) {
            return self.0.clone();
        }
        match family {
            RuntimeFamily::Python => format!("^{}", self.0),
            RuntimeFamily::Node => format!(">={}", self.0),
        }
    }

    /// Bare version: leading operators stripped, first clause only.
    ///
    /// `">=3.9,<4"` → `"3.9"`, `"^3.11"` → `"3.11"`, `"3.10"` → `"3.10"`.
    pub fn tag(&self) -> &str {
        let trimmed = self
            .0
            .trim_start_matches(|c: char| matches!(c, '^' | '~' | '>' | '<' | '=' | '!' | ' '));
        trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .next()
            .unwrap_or(trimmed)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── DependencyGroup ───────────────────────────────────────────────────────────

/// Manifest group a dependency is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyGroup {
    Main,
    Test,
}

impl DependencyGroup {
    /// Groups in the order dependencies are added.
    pub const ALL: [DependencyGroup; 2] = [Self::Main, Self::Test];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for DependencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── IdempotencyClass ──────────────────────────────────────────────────────────

/// How a unit of work behaves when the run is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdempotencyClass {
    /// Done only if the target is missing; existing content is never touched.
    CreateIfAbsent,
    /// Always rewritten; safe because the content is deterministic.
    Overwrite,
    /// Delegated to an external tool that detects its own prior work.
    ExternalCall,
}

impl IdempotencyClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateIfAbsent => "create-if-absent",
            Self::Overwrite => "overwrite",
            Self::ExternalCall => "external-call",
        }
    }
}

impl fmt::Display for IdempotencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
