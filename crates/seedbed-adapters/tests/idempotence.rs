//! Running twice against a real directory yields the same tree.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use seedbed_adapters::{LocalFilesystem, ScriptedToolchain};
use seedbed_core::application::{ScaffoldOptions, ScaffoldService, StepName, StepStatus};
use walkdir::WalkDir;

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
options:
  license: MIT
  packageMarkers: true
"#;

/// Relative path → file content (`None` for directories).
fn snapshot(root: &Path) -> BTreeMap<String, Option<String>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = entry
                .file_type()
                .is_file()
                .then(|| std::fs::read_to_string(entry.path()).unwrap());
            (rel, content)
        })
        .collect()
}

fn service(tools: &ScriptedToolchain) -> ScaffoldService {
    ScaffoldService::new(Box::new(LocalFilesystem::new()), tools.toolchain()).with_options(
        ScaffoldOptions {
            generated_on: NaiveDate::from_ymd_opt(2026, 10, 19),
            ..ScaffoldOptions::default()
        },
    )
}

#[test]
fn second_run_leaves_the_tree_unchanged() {
    let out = tempfile::tempdir().unwrap();
    let tools = ScriptedToolchain::new();
    let document: serde_yaml::Value = serde_yaml::from_str(DEMO).unwrap();

    let first = service(&tools).scaffold_document(&document, out.path()).unwrap();
    assert!(first.is_completed());
    let before = snapshot(&out.path().join("demo"));

    let second = service(&tools).scaffold_document(&document, out.path()).unwrap();
    assert!(second.is_completed());
    let after = snapshot(&out.path().join("demo"));

    assert_eq!(before, after);
    assert!(before.contains_key("src/models/__init__.py"));
    assert!(before.contains_key(".github/workflows/ci.yml"));
    assert_eq!(
        second.step(StepName::ManifestInit).unwrap().status,
        StepStatus::Skipped
    );
}

#[test]
fn second_run_keeps_edits_to_user_owned_files() {
    let out = tempfile::tempdir().unwrap();
    let tools = ScriptedToolchain::new();
    let document: serde_yaml::Value = serde_yaml::from_str(DEMO).unwrap();

    service(&tools).scaffold_document(&document, out.path()).unwrap();
    let root = out.path().join("demo");
    std::fs::write(root.join("pyproject.toml"), "# edited\n").unwrap();
    std::fs::write(root.join(".gitignore"), "drifted\n").unwrap();

    service(&tools).scaffold_document(&document, out.path()).unwrap();

    assert_eq!(
        std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
        "# edited\n"
    );
    // Overwrite-class files are restored to their generated content.
    assert_ne!(std::fs::read_to_string(root.join(".gitignore")).unwrap(), "drifted\n");
}
