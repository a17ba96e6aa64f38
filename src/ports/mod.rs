mod environment;
mod manifest_store;

pub use environment::{EnvironmentReader, IMAGE_TAG_VAR};
pub use manifest_store::ManifestStore;
