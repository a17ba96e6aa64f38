use serde::{Serialize, Serializer};

use super::validation::validate_logical_id;
use crate::domain::AppError;

/// A validated logical resource identifier.
///
/// Guarantees:
/// - Non-empty, at most 255 characters
/// - Starts with an ASCII letter
/// - Contains only ASCII alphanumeric characters
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalId(String);

impl LogicalId {
    /// Validate and create a new `LogicalId`.
    pub fn new(id: &str) -> Result<Self, AppError> {
        if validate_logical_id(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(AppError::InvalidLogicalId(id.to_string()))
        }
    }

    /// Return the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for LogicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for LogicalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
