//! Container image tags and registry references.

use serde::{Serialize, Serializer};

use crate::domain::AppError;
use crate::domain::identities::validation::validate_image_tag;

/// Tag used when no image tag is supplied.
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// A validated container image tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn new(tag: &str) -> Result<Self, AppError> {
        if validate_image_tag(tag) {
            Ok(Self(tag.to_string()))
        } else {
            Err(AppError::InvalidImageTag(tag.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ImageTag {
    fn default() -> Self {
        Self(DEFAULT_IMAGE_TAG.to_string())
    }
}

impl std::fmt::Display for ImageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully qualified image reference: `<repository>:<tag>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    repository: String,
    tag: ImageTag,
}

impl ImageReference {
    /// Build a reference from a repository validated by [`validate_repository`].
    pub fn new(repository: &str, tag: ImageTag) -> Result<Self, AppError> {
        validate_repository(repository)?;
        Ok(Self { repository: repository.to_string(), tag })
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

impl Serialize for ImageReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Check a registry repository path such as `danieltimko/recipes-rs`.
pub fn validate_repository(repository: &str) -> Result<(), AppError> {
    let invalid = |reason: &str| AppError::invalid_constant("service.image_repository", reason);

    if repository.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !repository
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/'))
    {
        return Err(invalid("may only contain lowercase letters, digits, '.', '_', '-', and '/'"));
    }
    let ends_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !ends_ok(repository.chars().next()) || !ends_ok(repository.chars().last()) {
        return Err(invalid("must start and end with a letter or digit"));
    }
    if repository.split('/').any(str::is_empty) {
        return Err(invalid("must not contain empty path segments"));
    }
    Ok(())
}
