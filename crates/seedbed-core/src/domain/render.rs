//! Rendering generated files from a validated [`ProjectConfig`].
//!
//! Every renderer is a pure `RenderContext → String` function: no
//! filesystem access, no failure path. Static bodies live under
//! `templates/` and use `{{VARIABLE}}` placeholders; the manifest is built
//! in code because its entries come from the dependency lists.
//!
//! The run itself never writes the fully declared manifest. Right after
//! manifest init it writes [`manifest_skeleton`] and the dependency
//! manager records each dependency as it is added, so a failed add never
//! shows up in the file.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::domain::{
    entities::{
        artifact::Artifact,
        config::{Dependencies, ProjectConfig},
    },
    value_objects::{DependencyGroup, RuntimeFamily},
};

mod templates {
    pub mod python {
        pub const IGNORE: &str = include_str!("../../templates/python/gitignore.tmpl");
        pub const README: &str = include_str!("../../templates/python/README.md.tmpl");
        pub const CONTAINER: &str = include_str!("../../templates/python/Dockerfile.tmpl");
        pub const HOOKS: &str = include_str!("../../templates/python/pre-commit-config.yaml.tmpl");
        pub const CI: &str = include_str!("../../templates/python/ci.yml.tmpl");
    }
    pub mod node {
        pub const IGNORE: &str = include_str!("../../templates/node/gitignore.tmpl");
        pub const README: &str = include_str!("../../templates/node/README.md.tmpl");
        pub const CONTAINER: &str = include_str!("../../templates/node/Dockerfile.tmpl");
        pub const HOOKS: &str = include_str!("../../templates/node/pre-commit-config.yaml.tmpl");
        pub const CI: &str = include_str!("../../templates/node/ci.yml.tmpl");
    }
    pub const LICENSE_MIT: &str = include_str!("../../templates/LICENSE-MIT.tmpl");
}

/// Context for template rendering.
///
/// Built once per run. All variables are derived up front; rendering is a
/// plain substitution pass afterwards.
///
/// ## Built-in Variables
///
/// | Variable | Example | Source |
/// |----------|---------|--------|
/// | `PROJECT_NAME` | "demo-app" | `name` |
/// | `PROJECT_NAME_KEBAB` | "demo-app" | Computed |
/// | `PACKAGE_NAME` | "demo_app" | Computed (snake_case) |
/// | `PROJECT_VERSION` | "0.1.0" | `version` |
/// | `RUNTIME_VERSION` | "^3.9" | `runtimeVersion` |
/// | `RUNTIME_TAG` | "3.9" | Computed |
/// | `MANIFEST_FILE` | "pyproject.toml" | Runtime family |
/// | `CI_MATRIX` | `["3.9", "3.10"]` | Computed |
/// | `GENERATED_ON` | "2026-10-19" | Clock |
/// | `YEAR` | "2026" | Clock |
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    config: &'a ProjectConfig,
    variables: HashMap<&'static str, String>,
}

impl<'a> RenderContext<'a> {
    /// Context stamped with today's local date.
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self::with_date(config, Local::now().date_naive())
    }

    /// Context stamped with a fixed date, for reproducible output.
    pub fn with_date(config: &'a ProjectConfig, generated_on: NaiveDate) -> Self {
        let runtime = config.runtime();
        let version = config.runtime_version();
        let mut vars = HashMap::new();

        vars.insert("PROJECT_NAME", config.name().to_string());
        vars.insert("PROJECT_NAME_KEBAB", to_kebab_case(config.name()));
        vars.insert("PACKAGE_NAME", to_snake_case(config.name()));
        vars.insert("PROJECT_VERSION", config.version().to_string());
        vars.insert("RUNTIME_VERSION", version.to_string());
        vars.insert("RUNTIME_TAG", version.tag().to_string());
        vars.insert("MANIFEST_FILE", runtime.manifest_file().to_string());
        vars.insert("CI_MATRIX", ci_matrix(config));
        vars.insert("GENERATED_ON", generated_on.format("%Y-%m-%d").to_string());
        vars.insert("YEAR", generated_on.year().to_string());

        Self {
            config,
            variables: vars,
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        self.config
    }

    /// Get a variable value if it exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace `{{VARIABLE}}` placeholders. Unknown placeholders, and
    /// GitHub's `${{ expr }}` syntax, are left as-is.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

/// Dispatch one artifact to its renderer.
pub(crate) fn render_artifact(artifact: Artifact, ctx: &RenderContext<'_>) -> String {
    use templates::{node, python};

    let runtime = ctx.config.runtime();
    let pick = |py: &'static str, js: &'static str| match runtime {
        RuntimeFamily::Python => py,
        RuntimeFamily::Node => js,
    };

    match artifact {
        Artifact::Manifest => render_manifest(ctx.config, ctx.config.dependencies()),
        Artifact::IgnoreFile => pick(python::IGNORE, node::IGNORE).to_string(),
        Artifact::Readme => ctx.render(pick(python::README, node::README)),
        Artifact::ContainerFile => ctx.render(pick(python::CONTAINER, node::CONTAINER)),
        Artifact::HookConfig => pick(python::HOOKS, node::HOOKS).to_string(),
        Artifact::CiWorkflow => ctx.render(pick(python::CI, node::CI)),
        Artifact::License => ctx.render(templates::LICENSE_MIT),
    }
}

// ── CI matrix ─────────────────────────────────────────────────────────────────

/// Configured runtime first, then the extra versions, deduplicated.
fn ci_matrix(config: &ProjectConfig) -> String {
    let mut seen = HashSet::new();
    let entries: Vec<String> = std::iter::once(config.runtime_version())
        .chain(config.options().ci_runtime_versions())
        .map(|v| v.tag().to_string())
        .filter(|tag| seen.insert(tag.clone()))
        .map(|tag| format!("\"{tag}\""))
        .collect();
    format!("[{}]", entries.join(", "))
}

// ── manifests ─────────────────────────────────────────────────────────────────

/// Split `numpy>=1.26` into (`numpy`, `>=1.26`); a bare name gets `*`.
fn split_requirement(raw: &str, runtime: RuntimeFamily) -> (String, String) {
    let cut = match runtime {
        // Scoped npm packages start with '@'; the version separator is a later '@'.
        RuntimeFamily::Node => raw
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '@')
            .map(|(i, _)| i),
        RuntimeFamily::Python => raw.find(|c: char| {
            matches!(c, '<' | '>' | '=' | '!' | '~' | '^' | '[' | ';' | '@' | ' ')
        }),
    };
    match cut {
        Some(i) => {
            let name = raw[..i].trim().to_string();
            let rest = raw[i..].trim_start_matches('@').trim();
            // Extras and markers are left to the dependency manager.
            let constraint = if rest.is_empty() || rest.starts_with(['[', ';']) {
                "*".to_string()
            } else {
                rest.to_string()
            };
            (name, constraint)
        }
        None => (raw.trim().to_string(), "*".to_string()),
    }
}

/// The manifest for `config` listing exactly `dependencies`, each name
/// once per group.
pub fn render_manifest(config: &ProjectConfig, dependencies: &Dependencies) -> String {
    match config.runtime() {
        RuntimeFamily::Python => pyproject_manifest(config, dependencies),
        RuntimeFamily::Node => package_json_manifest(config, dependencies),
    }
}

/// Name, version and runtime constraint with empty dependency groups.
pub fn manifest_skeleton(config: &ProjectConfig) -> String {
    render_manifest(config, &Dependencies::default())
}

/// Group entries with duplicates removed, first declaration wins.
fn manifest_entries(
    config: &ProjectConfig,
    dependencies: &Dependencies,
    group: DependencyGroup,
    reserved: &[&str],
) -> Vec<(String, String)> {
    let mut seen: HashSet<String> = reserved.iter().map(|s| s.to_string()).collect();
    dependencies
        .group(group)
        .iter()
        .map(|dep| split_requirement(dep.name(), config.runtime()))
        .filter(|(name, _)| seen.insert(name.to_ascii_lowercase()))
        .collect()
}

fn toml_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn pyproject_manifest(config: &ProjectConfig, dependencies: &Dependencies) -> String {
    let mut out = String::new();
    out.push_str("[tool.poetry]\n");
    out.push_str(&format!("name = {}\n", toml_string(config.name())));
    out.push_str(&format!("version = {}\n", toml_string(config.version())));
    out.push_str("description = \"\"\n");
    out.push_str("authors = []\n");
    out.push_str("readme = \"README.md\"\n");

    out.push_str("\n[tool.poetry.dependencies]\n");
    out.push_str(&format!(
        "python = {}\n",
        toml_string(&config.runtime_version().constraint(RuntimeFamily::Python))
    ));
    let main = manifest_entries(config, dependencies, DependencyGroup::Main, &["python"]);
    for (name, constraint) in main {
        out.push_str(&format!("{} = {}\n", toml_string(&name), toml_string(&constraint)));
    }

    let test = manifest_entries(config, dependencies, DependencyGroup::Test, &[]);
    if !test.is_empty() {
        out.push_str("\n[tool.poetry.group.test.dependencies]\n");
        for (name, constraint) in test {
            out.push_str(&format!("{} = {}\n", toml_string(&name), toml_string(&constraint)));
        }
    }

    out.push_str("\n[build-system]\n");
    out.push_str("requires = [\"poetry-core\"]\n");
    out.push_str("build-backend = \"poetry.core.masonry.api\"\n");
    out
}

#[derive(Serialize)]
struct PackageJson<'a> {
    name: String,
    version: &'a str,
    private: bool,
    description: &'a str,
    scripts: BTreeMap<&'static str, &'static str>,
    engines: BTreeMap<&'static str, String>,
    dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

fn package_json_manifest(config: &ProjectConfig, dependencies: &Dependencies) -> String {
    let manifest = PackageJson {
        name: to_kebab_case(config.name()),
        version: config.version(),
        private: true,
        description: "",
        scripts: BTreeMap::from([("test", "node --test")]),
        engines: BTreeMap::from([(
            "node",
            config.runtime_version().constraint(RuntimeFamily::Node),
        )]),
        dependencies: manifest_entries(config, dependencies, DependencyGroup::Main, &[])
            .into_iter()
            .collect(),
        dev_dependencies: manifest_entries(config, dependencies, DependencyGroup::Test, &[])
            .into_iter()
            .collect(),
    };
    // Plain string maps always serialize.
    let mut json = serde_json::to_string_pretty(&manifest).unwrap_or_default();
    json.push('\n');
    json
}

// ============================================================================
// String Case Conversion Helpers
// ============================================================================

/// Convert a string to snake_case (`my-app` → `my_app`).
fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to kebab-case (`MyApp` → `my-app`).
fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Split a string into lowercase words.
///
/// Boundaries: `_`, `-`, `.`, whitespace, a lower→upper transition
/// (`myApp`), and the end of an acronym (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
