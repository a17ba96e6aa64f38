use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AppError;
use crate::ports::ManifestStore;

/// Default directory manifests are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "manifest.out";

/// Writes manifests into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct FilesystemManifestStore {
    out_dir: PathBuf,
}

impl FilesystemManifestStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl ManifestStore for FilesystemManifestStore {
    fn write_manifest(&self, file_name: &str, content: &str) -> Result<PathBuf, AppError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(AppError::config_error(format!(
                "Invalid manifest file name '{}'",
                file_name
            )));
        }

        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(file_name);
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote manifest");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_directory_and_writes_file() {
        let tmp = TempDir::new().unwrap();
        let store = FilesystemManifestStore::new(tmp.path().join("nested/out"));

        let path = store.write_manifest("Stack.manifest.json", "{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(path.starts_with(store.out_dir()));
    }

    #[test]
    fn rejects_path_like_names() {
        let tmp = TempDir::new().unwrap();
        let store = FilesystemManifestStore::new(tmp.path());

        assert!(store.write_manifest("../escape.json", "{}").is_err());
        assert!(store.write_manifest("", "{}").is_err());
    }
}
