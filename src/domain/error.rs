use std::io;

use thiserror::Error;

/// Library-wide error type for topology declaration.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Container image tag is malformed.
    #[error(
        "Invalid image tag '{0}': must start with an alphanumeric or '_' and contain at most 128 characters from [A-Za-z0-9_.-]"
    )]
    InvalidImageTag(String),

    /// A naming or sizing constant failed validation.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidConstant { name: String, reason: String },

    /// Logical resource identifier is invalid.
    #[error("Invalid logical id '{0}': must start with a letter and be alphanumeric")]
    InvalidLogicalId(String),

    /// Two resources were declared under the same logical id.
    #[error("Resource '{0}' is declared more than once")]
    DuplicateResource(String),

    /// Two stack outputs share a name.
    #[error("Output '{0}' is declared more than once")]
    DuplicateOutput(String),

    /// A token points at a resource that is not part of the manifest.
    #[error("'{from}' references unknown resource '{target}'")]
    UnresolvedReference { from: String, target: String },

    /// A token asks for an attribute the target resource does not export.
    #[error("'{from}' references attribute '{attribute}' which '{target}' does not export")]
    UnresolvedAttribute { from: String, target: String, attribute: String },

    /// Resource references form a cycle.
    #[error("Circular reference detected between: {0}")]
    CircularReference(String),

    /// A network-scoped resource is not placed in exactly one network.
    #[error("Network membership violated: {0}")]
    NetworkMembership(String),

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Manifest could not be rendered in the requested format.
    #[error("Failed to serialize manifest as {format}: {details}")]
    Serialization { format: String, details: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn invalid_constant<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        AppError::InvalidConstant { name: name.into(), reason: reason.into() }
    }
}
