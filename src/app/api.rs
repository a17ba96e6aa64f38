//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::PathBuf;

use crate::adapters::{FilesystemManifestStore, ProcessEnvironment};
use crate::app::AppContext;
use crate::app::commands::{list, synth, validate};
use crate::app::config::{ConfigSources, resolve_config};
use crate::domain::{ImageTag, Manifest, StackConfig, declare};

pub use crate::adapters::manifest_filesystem::DEFAULT_OUTPUT_DIR;
pub use crate::app::commands::list::ResourceEntry;
pub use crate::app::commands::synth::{SynthOptions, SynthOutcome};
pub use crate::app::commands::validate::ValidateOutcome;
pub use crate::domain::{AppError, ManifestFormat};

/// Declare the topology for an optional image tag, with every other constant at its default.
///
/// `None` is equivalent to `Some("latest")`.
pub fn declare_topology(image_tag: Option<&str>) -> Result<Manifest, AppError> {
    let config = match image_tag {
        Some(tag) => StackConfig::default().with_image_tag(ImageTag::new(tag)?),
        None => StackConfig::default(),
    };
    declare(&config)
}

/// Resolve configuration from the process environment and optional file, then declare.
pub fn declare_from_sources(sources: &ConfigSources) -> Result<Manifest, AppError> {
    let config = resolve_config(sources, &ProcessEnvironment)?;
    declare(&config)
}

/// Synthesize the manifest into `out_dir` (or only render it when `options.to_stdout`).
pub fn synth(out_dir: impl Into<PathBuf>, options: &SynthOptions) -> Result<SynthOutcome, AppError> {
    let ctx = AppContext::new(ProcessEnvironment, FilesystemManifestStore::new(out_dir));
    synth::execute(&ctx, options)
}

/// Evaluate the topology and summarize it without writing files.
pub fn validate(sources: &ConfigSources) -> Result<ValidateOutcome, AppError> {
    validate::execute(sources, &ProcessEnvironment)
}

/// Resources in deployment order.
pub fn list(sources: &ConfigSources) -> Result<Vec<ResourceEntry>, AppError> {
    list::execute(sources, &ProcessEnvironment)
}
