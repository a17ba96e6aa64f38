pub mod manifest_filesystem;
pub mod process_environment;

pub use manifest_filesystem::FilesystemManifestStore;
pub use process_environment::ProcessEnvironment;
