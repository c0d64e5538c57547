// ============================================================================
// domain/error.rs - CONFIGURATION ERRORS
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Validation error for a project configuration document.
///
/// Every variant carries the path-qualified name of the offending field
/// (`name`, `dependencies.main[2]`, `structure[0].src[1]`), so the user can
/// find the first problem without re-reading the whole document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required field missing: {field}")]
    MissingField { field: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("duplicate entry '{name}' at {field}")]
    DuplicateEntry { field: String, name: String },

    #[error("'{name}' at {field} is not a safe path segment")]
    UnsafePathSegment { field: String, name: String },
}

impl ConfigError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Path-qualified name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::InvalidField { field, .. }
            | Self::DuplicateEntry { field, .. }
            | Self::UnsafePathSegment { field, .. } => field,
        }
    }

    /// Every configuration problem is a validation failure; kept as a method
    /// so callers treat all error layers alike.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingField { field } => vec![
                format!("Add '{field}' to the configuration document"),
                "Required keys: name, version, runtimeVersion".into(),
            ],
            Self::InvalidField { field, reason } => vec![
                format!("Fix '{field}': {reason}"),
            ],
            Self::DuplicateEntry { name, .. } => vec![
                format!("'{name}' is declared twice under the same parent"),
                "Merge the two entries into one".into(),
            ],
            Self::UnsafePathSegment { name, .. } => vec![
                format!("'{name}' cannot be used as a directory name"),
                "Use letters, digits, '-', '_' and '.' only".into(),
                "Nested paths are declared as children, not with '/'".into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_qualified_field() {
        let err = ConfigError::invalid("dependencies.main[2]", "expected a non-empty string");
        assert_eq!(
            err.to_string(),
            "invalid value for 'dependencies.main[2]': expected a non-empty string"
        );
        assert_eq!(err.field(), "dependencies.main[2]");
    }

    #[test]
    fn every_variant_has_suggestions() {
        let errors = [
            ConfigError::missing("name"),
            ConfigError::invalid("version", "empty"),
            ConfigError::DuplicateEntry {
                field: "structure[0].src[1]".into(),
                name: "scripts".into(),
            },
            ConfigError::UnsafePathSegment {
                field: "structure[0]".into(),
                name: "..".into(),
            },
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty(), "{err}");
        }
    }
}
