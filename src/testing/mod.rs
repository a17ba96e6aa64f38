mod fake_environment;
mod memory_manifest_store;

pub use fake_environment::FakeEnvironment;
pub use memory_manifest_store::MemoryManifestStore;
