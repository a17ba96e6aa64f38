use std::path::PathBuf;

use crate::domain::AppError;

/// Port for persisting rendered manifests.
pub trait ManifestStore {
    /// Write `content` under `file_name`, replacing any previous manifest.
    ///
    /// Returns the location written.
    fn write_manifest(&self, file_name: &str, content: &str) -> Result<PathBuf, AppError>;
}
