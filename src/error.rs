//! Error types for `mdx-components`
//!
//! Rendering, registry, and configuration errors, plus the top-level error
//! the CLI maps onto process exit codes.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `mdx-components` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Render error (invalid node, depth exceeded, component failure)
    pub const RENDER_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `mdx-components` operations.
///
/// Aggregates all domain-specific errors and provides a unified
/// interface for exit code mapping.
#[derive(Debug, Error)]
pub enum MdxError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Rendering error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Registry initialization error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MdxError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Render(_) => ExitCode::RENDER_ERROR,
            Self::Registry(_) => ExitCode::ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that abort a render pass.
///
/// A render pass stops at the first error; there is no local recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A content node is malformed (missing tag, bad `components` attribute).
    #[error("invalid node at {path}: {reason}")]
    InvalidNode {
        /// Location of the node in the tree (e.g. `$.children[1]`)
        path: String,
        /// What is wrong with the node
        reason: String,
    },

    /// The tree nests deeper than the configured limit.
    #[error("nesting depth exceeds {limit} at {path}")]
    DepthExceeded {
        /// Location of the first node past the limit
        path: String,
        /// Configured maximum depth
        limit: usize,
    },

    /// A component implementation refused to render.
    #[error("component '{name}' failed: {message}")]
    Component {
        /// Name of the failing component
        name: String,
        /// Failure description
        message: String,
    },
}

impl RenderError {
    /// Creates an invalid-node error.
    pub fn invalid_node(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a component failure error.
    pub fn component(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            name: name.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors raised while installing the process-wide registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry was already initialized for this process.
    #[error("default component registry is already initialized")]
    AlreadyInstalled,
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Component-library loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Component references form a cycle
    #[error("circular component reference: {}", cycle.join(" -> "))]
    CircularReference {
        /// Component names forming the cycle, first name repeated at the end
        cycle: Vec<String>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in configuration is not set
    #[error("environment variable '{var}' not set ({message})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Message supplied with `${VAR:?message}`
        message: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found in a component library.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g. `components.note.tag`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the library from being used
    Error,
    /// Reported, but does not prevent loading
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_exit_code() {
        let err: MdxError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_render_error_exit_code() {
        let err: MdxError = RenderError::invalid_node("$", "missing tag").into();
        assert_eq!(err.exit_code(), ExitCode::RENDER_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: MdxError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = MdxError::Usage("bad scope".to_string());
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
    }

    #[test]
    fn test_invalid_node_display() {
        let err = RenderError::invalid_node("$.children[2]", "missing tag");
        assert_eq!(
            err.to_string(),
            "invalid node at $.children[2]: missing tag"
        );
    }

    #[test]
    fn test_circular_reference_display() {
        let err = ConfigError::CircularReference {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "circular component reference: a -> b -> a");
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "components.note.tag".to_string(),
            message: "tag is empty".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(issue.to_string(), "error: tag is empty at components.note.tag");
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "components.wrapper".to_string(),
            message: "overrides a builtin component".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: overrides a builtin component at components.wrapper"
        );
    }

    #[test]
    fn test_env_var_display() {
        let err = ConfigError::EnvVarNotSet {
            var: "SITE_THEME".to_string(),
            message: "theme is required".to_string(),
        };
        assert!(err.to_string().contains("SITE_THEME"));
        assert!(err.to_string().contains("theme is required"));
    }
}
