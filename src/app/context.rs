use crate::ports::{EnvironmentReader, ManifestStore};

/// Application context holding dependencies for command execution.
pub struct AppContext<E: EnvironmentReader, S: ManifestStore> {
    environment: E,
    store: S,
}

impl<E: EnvironmentReader, S: ManifestStore> AppContext<E, S> {
    /// Create a new application context.
    pub fn new(environment: E, store: S) -> Self {
        Self { environment, store }
    }

    /// Get a reference to the environment reader.
    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Get a reference to the manifest store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
