use url::Url;

use crate::domain::error::ConfigError;

/// Centralized field-level validation.
///
/// The decoder decides *which* field to check and in what order; the rules
/// for what a valid value looks like live here.
pub struct ConfigValidator;

impl ConfigValidator {
    /// A single directory name: non-empty, not `.`/`..`, and made only of
    /// characters that are portable in a path segment.
    pub fn path_segment(field: &str, name: &str) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::invalid(field, "name cannot be empty"));
        }
        let portable = name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !portable || name == "." || name == ".." {
            return Err(ConfigError::UnsafePathSegment {
                field: field.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// A declared directory: a path segment that does not name the
    /// repository's own metadata directory.
    pub fn structure_entry(field: &str, name: &str) -> Result<(), ConfigError> {
        Self::path_segment(field, name)?;
        if name.eq_ignore_ascii_case(".git") {
            return Err(ConfigError::invalid(
                field,
                "`.git` is reserved for the repository",
            ));
        }
        Ok(())
    }

    /// The project name becomes the root directory, so it must be a path
    /// segment and must not be hidden.
    pub fn project_name(field: &str, name: &str) -> Result<(), ConfigError> {
        Self::path_segment(field, name)?;
        if name.starts_with('.') {
            return Err(ConfigError::invalid(field, "name cannot start with '.'"));
        }
        Ok(())
    }

    /// A remote URL needs at least a scheme and a host.
    ///
    /// scp-style addresses (`git@host:owner/repo.git`) have neither and are
    /// rejected; `ssh://git@host/owner/repo.git` is the accepted spelling.
    pub fn remote_url(field: &str, raw: &str) -> Result<(), ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::invalid(field, format!("not a URL: {e}")))?;
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(ConfigError::invalid(field, "URL has no host")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_portable_segments() {
        for name in ["src", "my-project", "data_2024", ".github", "v1.2"] {
            assert!(ConfigValidator::path_segment("f", name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_escaping_and_separators() {
        for name in ["..", ".", "a/b", "a\\b", "with space", "x:y"] {
            assert!(
                matches!(
                    ConfigValidator::path_segment("f", name),
                    Err(ConfigError::UnsafePathSegment { .. })
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn repository_directory_is_reserved() {
        for name in [".git", ".GIT"] {
            assert!(
                matches!(
                    ConfigValidator::structure_entry("structure[0]", name),
                    Err(ConfigError::InvalidField { .. })
                ),
                "{name}"
            );
        }
        assert!(ConfigValidator::structure_entry("structure[0]", ".github").is_ok());
        assert!(ConfigValidator::structure_entry("structure[0]", ".gitkeep").is_ok());
    }

    #[test]
    fn hidden_project_name_rejected() {
        assert!(ConfigValidator::project_name("name", ".hidden").is_err());
        assert!(ConfigValidator::project_name("name", "demo").is_ok());
    }

    #[test]
    fn remote_url_requires_scheme_and_host() {
        assert!(ConfigValidator::remote_url("remoteUrl", "https://example.com/demo.git").is_ok());
        assert!(ConfigValidator::remote_url("remoteUrl", "ssh://git@example.com/demo.git").is_ok());
        assert!(ConfigValidator::remote_url("remoteUrl", "git@example.com:demo.git").is_err());
        assert!(ConfigValidator::remote_url("remoteUrl", "example.com/demo").is_err());
        assert!(ConfigValidator::remote_url("remoteUrl", "file:///tmp/demo.git").is_err());
    }
}
