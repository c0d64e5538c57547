//! Decoding a generic YAML document into a validated [`ProjectConfig`].
//!
//! The YAML parser is an external collaborator: this module only sees the
//! `serde_yaml::Value` tree it produced. Validation is fail-fast and follows
//! a fixed field order (name, version, runtimeVersion, dependencies,
//! structure, remoteUrl, runtime, options), so the same document always
//! reports the same first error. A last check rejects declared directories
//! that land on a generated file.
//!
//! Keys written in snake_case by older documents (`project_name`,
//! `python_version`, `remote_url`) are accepted as aliases; errors always
//! use the camelCase name.

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::domain::{
    entities::config::{
        Dependencies, Dependency, DirectoryNode, License, ProjectConfig, ProjectOptions,
    },
    error::ConfigError,
    planner::TreePlanner,
    validation::ConfigValidator,
    value_objects::{DependencyGroup, RuntimeFamily, RuntimeVersion},
};

const NAME: &[&str] = &["name", "project_name"];
const VERSION: &[&str] = &["version"];
const RUNTIME_VERSION: &[&str] = &["runtimeVersion", "runtime_version", "python_version"];
const DEPENDENCIES: &[&str] = &["dependencies"];
const STRUCTURE: &[&str] = &["structure"];
const REMOTE_URL: &[&str] = &["remoteUrl", "remote_url"];
const RUNTIME: &[&str] = &["runtime"];
const OPTIONS: &[&str] = &["options"];

/// Decode and validate a project configuration document.
///
/// Pure: no filesystem access, no logging above `debug`.
pub fn project_config(document: &Value) -> Result<ProjectConfig, ConfigError> {
    let root = document.as_mapping().ok_or_else(|| {
        ConfigError::invalid("<document>", "expected a mapping at the top level")
    })?;

    let name = required_string(root, "name", NAME)?;
    ConfigValidator::project_name("name", &name)?;

    let version = required_string(root, "version", VERSION)?;
    let runtime_version = RuntimeVersion::new(required_string(
        root,
        "runtimeVersion",
        RUNTIME_VERSION,
    )?);

    let dependencies = dependencies(root)?;
    let structure = structure(root)?;

    let remote_url = match optional_string(root, "remoteUrl", REMOTE_URL)? {
        Some(url) => {
            ConfigValidator::remote_url("remoteUrl", &url)?;
            Some(url)
        }
        None => None,
    };

    let runtime = match optional_string(root, "runtime", RUNTIME)? {
        Some(raw) => RuntimeFamily::from_str(&raw)?,
        None => RuntimeFamily::default(),
    };

    let options = options(root, runtime)?;

    debug!(
        project = %name,
        runtime = %runtime,
        dependencies = dependencies.len(),
        top_level_dirs = structure.len(),
        "configuration decoded"
    );

    let config = ProjectConfig {
        name,
        version,
        runtime,
        runtime_version,
        dependencies,
        structure,
        remote_url,
        options,
    };
    reject_generated_paths(&config)?;
    Ok(config)
}

/// A declared directory may not occupy a path the scaffold writes a file to.
fn reject_generated_paths(config: &ProjectConfig) -> Result<(), ConfigError> {
    let plan = TreePlanner::plan(config, PathBuf::new());
    match plan
        .files()
        .iter()
        .find(|file| plan.directories().contains(&file.path))
    {
        Some(file) => Err(ConfigError::invalid(
            "structure",
            format!("`{}` is a generated file and cannot be a directory", file.path),
        )),
        None => Ok(()),
    }
}

// ── scalar helpers ────────────────────────────────────────────────────────────

/// First non-null value among `keys`.
fn lookup<'a>(map: &'a Mapping, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|value| !value.is_null()))
}

fn required_string(map: &Mapping, field: &str, keys: &[&str]) -> Result<String, ConfigError> {
    optional_string(map, field, keys)?.ok_or_else(|| ConfigError::missing(field))
}

fn optional_string(
    map: &Mapping,
    field: &str,
    keys: &[&str],
) -> Result<Option<String>, ConfigError> {
    let Some(value) = lookup(map, keys) else {
        return Ok(None);
    };
    non_empty_string(value, field).map(Some)
}

fn non_empty_string(value: &Value, field: &str) -> Result<String, ConfigError> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(ConfigError::invalid(field, "cannot be empty")),
        Value::Number(n) => Err(ConfigError::invalid(
            field,
            format!("expected a string, found number {n}; quote versions like \"3.10\""),
        )),
        _ => Err(ConfigError::invalid(field, "expected a string")),
    }
}

fn optional_bool(map: &Mapping, field: &str, keys: &[&str]) -> Result<bool, ConfigError> {
    match lookup(map, keys) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ConfigError::invalid(field, "expected true or false")),
    }
}

fn key_str<'a>(key: &'a Value, parent: &str) -> Result<&'a str, ConfigError> {
    key.as_str()
        .ok_or_else(|| ConfigError::invalid(parent, "keys must be strings"))
}

// ── dependencies ──────────────────────────────────────────────────────────────

fn dependencies(root: &Mapping) -> Result<Dependencies, ConfigError> {
    let Some(value) = lookup(root, DEPENDENCIES) else {
        return Ok(Dependencies::default());
    };
    let map = value.as_mapping().ok_or_else(|| {
        ConfigError::invalid("dependencies", "expected a mapping with 'main' and 'test'")
    })?;

    let mut deps = Dependencies {
        main: dependency_list(map, DependencyGroup::Main)?,
        test: dependency_list(map, DependencyGroup::Test)?,
    };

    if let Some(sources) = lookup(map, &["sources"]) {
        apply_sources(&mut deps, sources)?;
    }

    for key in map.keys() {
        let key = key_str(key, "dependencies")?;
        if !matches!(key, "main" | "test" | "sources") {
            return Err(ConfigError::invalid(
                format!("dependencies.{key}"),
                "unknown dependency group (expected main or test)",
            ));
        }
    }

    Ok(deps)
}

fn dependency_list(map: &Mapping, group: DependencyGroup) -> Result<Vec<Dependency>, ConfigError> {
    let field = format!("dependencies.{group}");
    let Some(value) = lookup(map, &[group.as_str()]) else {
        return Ok(Vec::new());
    };
    let items = value
        .as_sequence()
        .ok_or_else(|| ConfigError::invalid(&field, "expected a sequence of package names"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let name = non_empty_string(item, &format!("{field}[{i}]"))?;
            Ok(Dependency::new(name))
        })
        .collect()
}

/// `dependencies.sources` maps a declared package to an alternate index.
fn apply_sources(deps: &mut Dependencies, value: &Value) -> Result<(), ConfigError> {
    let map = value.as_mapping().ok_or_else(|| {
        ConfigError::invalid("dependencies.sources", "expected a mapping of package: source")
    })?;

    for (key, source) in map {
        let package = key_str(key, "dependencies.sources")?;
        let field = format!("dependencies.sources.{package}");
        let source = non_empty_string(source, &field)?;

        let mut matched = false;
        for dep in deps.main.iter_mut().chain(deps.test.iter_mut()) {
            if dep.name == package {
                dep.source = Some(source.clone());
                matched = true;
            }
        }
        if !matched {
            return Err(ConfigError::invalid(field, "no such dependency is declared"));
        }
    }
    Ok(())
}

// ── structure ─────────────────────────────────────────────────────────────────

/// An entry waiting to be validated.
struct Pending<'a> {
    value: &'a Value,
    field: String,
    parent: Option<usize>,
}

/// A validated entry, in pre-order position.
struct Slot {
    name: String,
    parent: Option<usize>,
    seen: HashSet<String>,
}

/// Decode `structure` with an explicit worklist.
///
/// Entries are validated in document (pre-)order, so the first error
/// reported is the first one a reader would hit. The flat pre-order list is
/// then folded bottom-up into owned trees.
fn structure(root: &Mapping) -> Result<Vec<DirectoryNode>, ConfigError> {
    let Some(value) = lookup(root, STRUCTURE) else {
        return Ok(Vec::new());
    };
    let entries = value.as_sequence().ok_or_else(|| {
        ConfigError::invalid("structure", "expected a sequence of directory entries")
    })?;

    let mut slots: Vec<Slot> = Vec::new();
    let mut top_level = HashSet::new();
    let mut stack: Vec<Pending<'_>> = entries
        .iter()
        .enumerate()
        .rev()
        .map(|(i, value)| Pending {
            value,
            field: format!("structure[{i}]"),
            parent: None,
        })
        .collect();

    while let Some(pending) = stack.pop() {
        let (name, children) = directory_entry(pending.value, &pending.field)?;
        ConfigValidator::structure_entry(&pending.field, name)?;

        let siblings = match pending.parent {
            Some(parent) => &mut slots[parent].seen,
            None => &mut top_level,
        };
        if !siblings.insert(name.to_string()) {
            return Err(ConfigError::DuplicateEntry {
                field: pending.field,
                name: name.to_string(),
            });
        }

        let index = slots.len();
        slots.push(Slot {
            name: name.to_string(),
            parent: pending.parent,
            seen: HashSet::new(),
        });

        let children: &[Value] = match children {
            Value::Null => &[],
            Value::Sequence(seq) => seq.as_slice(),
            _ => {
                return Err(ConfigError::invalid(
                    format!("{}.{}", pending.field, name),
                    "expected a sequence of subdirectories or null",
                ));
            }
        };
        for (i, child) in children.iter().enumerate().rev() {
            stack.push(Pending {
                value: child,
                field: format!("{}.{}[{i}]", pending.field, name),
                parent: Some(index),
            });
        }
    }

    Ok(assemble(slots))
}

/// `{dirName: children-or-null}` → `(dirName, children)`.
fn directory_entry<'a>(value: &'a Value, field: &str) -> Result<(&'a str, &'a Value), ConfigError> {
    let shape = || ConfigError::invalid(field, "expected a single-key mapping {dirName: [...] | null}");
    let map = value.as_mapping().ok_or_else(shape)?;
    if map.len() != 1 {
        return Err(shape());
    }
    let (key, children) = map.iter().next().ok_or_else(shape)?;
    let name = key.as_str().ok_or_else(shape)?;
    Ok((name, children))
}

/// Fold pre-ordered slots into owned trees.
///
/// Walking indices backwards guarantees every child is finished before its
/// parent is moved; children arrive reversed and are flipped once.
fn assemble(slots: Vec<Slot>) -> Vec<DirectoryNode> {
    let mut nodes: Vec<Option<DirectoryNode>> = slots
        .iter()
        .map(|slot| Some(DirectoryNode::new(slot.name.clone())))
        .collect();
    let mut roots = Vec::new();

    for index in (0..slots.len()).rev() {
        let Some(mut node) = nodes[index].take() else {
            continue;
        };
        node.children.reverse();
        match slots[index].parent {
            Some(parent) => {
                if let Some(parent_node) = nodes[parent].as_mut() {
                    parent_node.children.push(node);
                }
            }
            None => roots.push(node),
        }
    }

    roots.reverse();
    roots
}

// ── options ───────────────────────────────────────────────────────────────────

fn options(root: &Mapping, runtime: RuntimeFamily) -> Result<ProjectOptions, ConfigError> {
    let Some(value) = lookup(root, OPTIONS) else {
        return Ok(ProjectOptions::default());
    };
    let map = value
        .as_mapping()
        .ok_or_else(|| ConfigError::invalid("options", "expected a mapping"))?;

    for key in map.keys() {
        let key = key_str(key, "options")?;
        if !matches!(
            key,
            "pinRuntime"
                | "pin_runtime"
                | "packageMarkers"
                | "package_markers"
                | "license"
                | "ciRuntimeVersions"
                | "ci_runtime_versions"
                | "initialCommit"
                | "initial_commit"
        ) {
            return Err(ConfigError::invalid(format!("options.{key}"), "unknown option"));
        }
    }

    let pin_runtime = optional_bool(map, "options.pinRuntime", &["pinRuntime", "pin_runtime"])?;

    let package_markers = optional_bool(
        map,
        "options.packageMarkers",
        &["packageMarkers", "package_markers"],
    )?;
    if package_markers && runtime != RuntimeFamily::Python {
        return Err(ConfigError::invalid(
            "options.packageMarkers",
            format!("package markers only apply to python projects, not {runtime}"),
        ));
    }

    let license = match optional_string(map, "options.license", &["license"])? {
        Some(raw) if raw.eq_ignore_ascii_case("mit") => Some(License::Mit),
        Some(other) => {
            return Err(ConfigError::invalid(
                "options.license",
                format!("unsupported license '{other}' (supported: MIT)"),
            ));
        }
        None => None,
    };

    let ci_runtime_versions = match lookup(map, &["ciRuntimeVersions", "ci_runtime_versions"]) {
        None => Vec::new(),
        Some(value) => {
            let items = value.as_sequence().ok_or_else(|| {
                ConfigError::invalid("options.ciRuntimeVersions", "expected a sequence of versions")
            })?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    non_empty_string(item, &format!("options.ciRuntimeVersions[{i}]"))
                        .map(RuntimeVersion::new)
                })
                .collect::<Result<_, _>>()?
        }
    };

    let initial_commit = optional_bool(
        map,
        "options.initialCommit",
        &["initialCommit", "initial_commit"],
    )?;

    Ok(ProjectOptions {
        pin_runtime,
        package_markers,
        license,
        ci_runtime_versions,
        initial_commit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(yaml: &str) -> Result<ProjectConfig, ConfigError> {
        let value: Value = serde_yaml::from_str(yaml).expect("test yaml must parse");
        project_config(&value)
    }

    const DEMO: &str = r#"
name: demo
version: "0.1.0"
runtimeVersion: "3.9"
dependencies:
  main: [numpy]
  test: [pytest]
structure:
  - src:
      - models: []
      - scripts: []
  - tests: []
"#;

    #[test]
    fn decodes_demo_document() {
        let config = decode(DEMO).unwrap();
        assert_eq!(config.name(), "demo");
        assert_eq!(config.version(), "0.1.0");
        assert_eq!(config.runtime_version().as_str(), "3.9");
        assert_eq!(config.runtime(), RuntimeFamily::Python);
        assert_eq!(config.dependencies().main()[0].name(), "numpy");
        assert_eq!(config.dependencies().test()[0].name(), "pytest");
        assert_eq!(config.remote_url(), None);

        let structure = config.structure();
        assert_eq!(structure.len(), 2);
        assert_eq!(structure[0].name(), "src");
        let children: Vec<_> = structure[0].children().iter().map(|c| c.name()).collect();
        assert_eq!(children, ["models", "scripts"]);
        assert!(structure[1].is_leaf());
    }

    #[test]
    fn reserved_repository_directory_is_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nstructure:\n  - src: []\n  - .git: []",
        )
        .unwrap_err();
        assert_eq!(err.field(), "structure[1]");
    }

    #[test]
    fn directory_shadowing_a_generated_file_is_rejected() {
        for entry in ["Dockerfile", "README.md"] {
            let yaml = format!(
                "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nstructure:\n  - {entry}: []"
            );
            let err = decode(&yaml).unwrap_err();
            assert_eq!(err.field(), "structure", "{entry}");
            assert!(err.to_string().contains(entry), "{entry}");
        }
    }

    #[test]
    fn package_marker_cannot_be_declared_as_a_directory() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nstructure:\n  - src:\n      - __init__.py: []",
        )
        .unwrap_err();
        assert_eq!(err.field(), "structure");
    }

    #[test]
    fn null_primary_key_falls_through_to_alias() {
        let config =
            decode("name: ~\nproject_name: demo\nversion: \"1\"\nruntime_version: \"3.9\"")
                .unwrap();
        assert_eq!(config.name(), "demo");
        assert_eq!(config.runtime_version().as_str(), "3.9");
    }

    #[test]
    fn missing_name_is_first_error() {
        let err = decode("version: \"1\"\nruntimeVersion: \"3.9\"").unwrap_err();
        assert_eq!(err, ConfigError::missing("name"));
    }

    #[test]
    fn validation_order_reports_version_before_runtime() {
        let err = decode("name: demo").unwrap_err();
        assert_eq!(err.field(), "version");
        let err = decode("name: demo\nversion: \"1\"").unwrap_err();
        assert_eq!(err.field(), "runtimeVersion");
    }

    #[test]
    fn snake_case_aliases_are_accepted() {
        let config = decode(
            "project_name: legacy\nversion: \"1.0\"\npython_version: \"3.8\"\nremote_url: https://example.com/x.git",
        )
        .unwrap();
        assert_eq!(config.name(), "legacy");
        assert_eq!(config.runtime_version().as_str(), "3.8");
        assert_eq!(config.remote_url(), Some("https://example.com/x.git"));
    }

    #[test]
    fn unquoted_numeric_version_is_rejected_with_hint() {
        let err = decode("name: demo\nversion: \"1\"\nruntimeVersion: 3.10").unwrap_err();
        assert_eq!(err.field(), "runtimeVersion");
        assert!(err.to_string().contains("quote"));
    }

    #[test]
    fn dependency_element_errors_are_path_qualified() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  main: [numpy, pandas, \"\"]",
        )
        .unwrap_err();
        assert_eq!(err.field(), "dependencies.main[2]");
    }

    #[test]
    fn absent_dependency_groups_default_to_empty() {
        let config = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  test: [pytest]",
        )
        .unwrap();
        assert!(config.dependencies().main().is_empty());
        assert_eq!(config.dependencies().test().len(), 1);
    }

    #[test]
    fn unknown_dependency_group_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  dev: [black]",
        )
        .unwrap_err();
        assert_eq!(err.field(), "dependencies.dev");
    }

    #[test]
    fn sources_attach_to_declared_dependencies() {
        let config = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  main: [torch, numpy]\n  sources:\n    torch: pytorch_cpu",
        )
        .unwrap();
        let main = config.dependencies().main();
        assert_eq!(main[0].source(), Some("pytorch_cpu"));
        assert_eq!(main[1].source(), None);
    }

    #[test]
    fn source_for_undeclared_dependency_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\ndependencies:\n  main: [numpy]\n  sources:\n    torch: pytorch_cpu",
        )
        .unwrap_err();
        assert_eq!(err.field(), "dependencies.sources.torch");
    }

    #[test]
    fn duplicate_sibling_rejected() {
        let err = decode(
            r#"
name: demo
version: "1"
runtimeVersion: "3.9"
structure:
  - src:
      - scripts: []
      - models: []
      - scripts: []
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateEntry {
                field: "structure[0].src[2]".into(),
                name: "scripts".into(),
            }
        );
    }

    #[test]
    fn same_name_under_different_parents_is_fine() {
        let config = decode(
            r#"
name: demo
version: "1"
runtimeVersion: "3.9"
structure:
  - src:
      - data: []
  - tests:
      - data: []
"#,
        )
        .unwrap();
        assert_eq!(config.structure().len(), 2);
    }

    #[test]
    fn parent_escape_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nstructure:\n  - src:\n      - \"..\": []",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsafePathSegment { .. }));
        assert_eq!(err.field(), "structure[0].src[0]");
    }

    #[test]
    fn bare_string_entry_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nstructure:\n  - src:\n      - main.py",
        )
        .unwrap_err();
        assert_eq!(err.field(), "structure[0].src[0]");
    }

    #[test]
    fn multi_key_entry_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nstructure:\n  - {src: [], docs: []}",
        )
        .unwrap_err();
        assert_eq!(err.field(), "structure[0]");
    }

    #[test]
    fn deep_nesting_keeps_document_order() {
        let config = decode(
            r#"
name: demo
version: "1"
runtimeVersion: "3.9"
structure:
  - a:
      - b:
          - c:
              - d: null
      - e: []
"#,
        )
        .unwrap();
        let a = &config.structure()[0];
        assert_eq!(a.children()[0].name(), "b");
        assert_eq!(a.children()[1].name(), "e");
        assert_eq!(a.children()[0].children()[0].children()[0].name(), "d");
    }

    #[test]
    fn malformed_remote_url_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\nremoteUrl: not a url",
        )
        .unwrap_err();
        assert_eq!(err.field(), "remoteUrl");
    }

    #[test]
    fn options_decode() {
        let config = decode(
            r#"
name: demo
version: "1"
runtimeVersion: "3.9"
options:
  pinRuntime: true
  packageMarkers: true
  license: mit
  ciRuntimeVersions: ["3.10", "3.11"]
  initialCommit: true
"#,
        )
        .unwrap();
        let options = config.options();
        assert!(options.pin_runtime());
        assert!(options.package_markers());
        assert_eq!(options.license(), Some(License::Mit));
        assert_eq!(options.ci_runtime_versions().len(), 2);
        assert!(options.initial_commit());
    }

    #[test]
    fn package_markers_rejected_for_node() {
        let err = decode(
            "name: web\nversion: \"1\"\nruntimeVersion: \"20\"\nruntime: node\noptions:\n  packageMarkers: true",
        )
        .unwrap_err();
        assert_eq!(err.field(), "options.packageMarkers");
    }

    #[test]
    fn unknown_option_rejected() {
        let err = decode(
            "name: demo\nversion: \"1\"\nruntimeVersion: \"3.9\"\noptions:\n  autoPush: true",
        )
        .unwrap_err();
        assert_eq!(err.field(), "options.autoPush");
    }

    #[test]
    fn non_mapping_document_rejected() {
        let err = decode("- just\n- a list").unwrap_err();
        assert_eq!(err.field(), "<document>");
    }
}
