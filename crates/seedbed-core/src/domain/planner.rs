//! Structure declaration → ordered filesystem plan.

use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::domain::{
    entities::{
        artifact::Artifact,
        common::RelativePath,
        config::{DirectoryNode, ProjectConfig},
        plan::{PlannedFile, ScaffoldPlan},
    },
    value_objects::RuntimeFamily,
};

/// Directory every scaffold gets for tests.
pub const TEST_ROOT: &str = "tests";

/// Directory whose subtree receives package markers.
const PACKAGE_ROOT: &str = "src";
const PACKAGE_MARKER: &str = "__init__.py";

pub struct TreePlanner;

impl TreePlanner {
    /// Build the plan for `config` rooted at `root`.
    ///
    /// Directory order: root, declared tree in pre-order, the test root,
    /// then parents of generated files. Files follow in artifact order.
    #[instrument(skip_all, fields(project = %config.name()))]
    pub fn plan(config: &ProjectConfig, root: impl Into<PathBuf>) -> ScaffoldPlan {
        let mut directories = vec![RelativePath::root()];
        let mut markers = Vec::new();
        let wants_markers =
            config.options().package_markers() && config.runtime() == RuntimeFamily::Python;

        // Pre-order with an explicit stack; siblings are pushed in reverse so
        // they pop in declared order.
        let mut stack: Vec<(RelativePath, &DirectoryNode, bool)> = config
            .structure()
            .iter()
            .rev()
            .map(|node| {
                let in_package = node.name() == PACKAGE_ROOT;
                (RelativePath::root().join(node.name()), node, in_package)
            })
            .collect();

        while let Some((path, node, in_package)) = stack.pop() {
            if wants_markers && in_package {
                markers.push(PlannedFile::placeholder(path.join(PACKAGE_MARKER)));
            }
            for child in node.children().iter().rev() {
                stack.push((path.join(child.name()), child, in_package));
            }
            directories.push(path);
        }

        let tests = RelativePath::root().join(TEST_ROOT);
        if !directories.contains(&tests) {
            directories.push(tests);
        }

        let mut artifacts: Vec<Artifact> = Artifact::REQUIRED.to_vec();
        if config.options().license().is_some() {
            artifacts.push(Artifact::License);
        }

        // Parent directories of generated files, e.g. `.github/workflows`.
        for artifact in &artifacts {
            let file = artifact.file_path(config.runtime());
            let mut parents = Vec::new();
            let mut cursor = file.parent();
            while let Some(dir) = cursor {
                if dir.is_root() {
                    break;
                }
                cursor = dir.parent();
                parents.push(dir);
            }
            for dir in parents.into_iter().rev() {
                if !directories.contains(&dir) {
                    directories.push(dir);
                }
            }
        }

        let mut files: Vec<PlannedFile> = artifacts
            .into_iter()
            .map(|a| PlannedFile::artifact(a, a.file_path(config.runtime())))
            .collect();
        files.extend(markers);

        debug!(
            directories = directories.len(),
            files = files.len(),
            "scaffold planned"
        );

        ScaffoldPlan {
            root: root.into(),
            directories,
            files,
        }
    }
}
