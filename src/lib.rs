//! recipes-infra: declare the recipes-rs cloud topology as a desired-state manifest.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    DEFAULT_OUTPUT_DIR, ResourceEntry, SynthOptions, SynthOutcome, ValidateOutcome,
    declare_from_sources, declare_topology, list, synth, validate,
};
pub use app::config::ConfigSources;
pub use domain::{AppError, Manifest, ManifestFormat, StackConfig, declare};
