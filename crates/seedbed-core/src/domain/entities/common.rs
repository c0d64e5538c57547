use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

/// A filesystem path guaranteed to be relative to the project root.
///
/// Invariant: never absolute and never contains `..`. Built one validated
/// segment at a time, so the invariant holds by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// The project root itself.
    pub fn root() -> Self {
        Self(PathBuf::new())
    }

    /// Build from `/`-separated segments known to be safe (static file
    /// targets like `.github/workflows/ci.yml`).
    pub(crate) fn from_static(path: &'static str) -> Self {
        path.split('/').fold(Self::root(), |acc, seg| acc.join(seg))
    }

    /// Append one validated segment.
    pub fn join(&self, segment: &str) -> Self {
        Self(self.0.join(segment))
    }

    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Parent directory, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0.parent().map(Path::to_path_buf).unwrap_or_default()))
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.0
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve against a concrete project root.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        // Forward slashes on every platform keep reports stable.
        let mut first = true;
        for component in self.0.components() {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_paths_split_on_slash() {
        let path = RelativePath::from_static(".github/workflows/ci.yml");
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), ".github/workflows/ci.yml");
        assert_eq!(path.parent().unwrap().to_string(), ".github/workflows");
    }

    #[test]
    fn root_displays_as_dot() {
        assert_eq!(RelativePath::root().to_string(), ".");
        assert!(RelativePath::root().parent().is_none());
        assert!(RelativePath::root().join("src").parent().unwrap().is_root());
    }
}
