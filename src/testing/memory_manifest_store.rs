use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::AppError;
use crate::ports::ManifestStore;

/// Manifest store that keeps written files in memory.
#[derive(Debug, Default)]
pub struct MemoryManifestStore {
    files: RefCell<BTreeMap<String, String>>,
}

impl MemoryManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<String> {
        self.files.borrow().get(file_name).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }
}

impl ManifestStore for MemoryManifestStore {
    fn write_manifest(&self, file_name: &str, content: &str) -> Result<PathBuf, AppError> {
        self.files.borrow_mut().insert(file_name.to_string(), content.to_string());
        Ok(PathBuf::from("memory").join(file_name))
    }
}
