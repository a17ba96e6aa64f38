use crate::domain::AppError;

/// Process environment variable carrying the container image tag.
pub const IMAGE_TAG_VAR: &str = "IMAGE_TAG";

/// Port for reading configuration from the process environment.
pub trait EnvironmentReader {
    /// Value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Result<Option<String>, AppError>;
}
