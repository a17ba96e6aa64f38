//! Environment- and file-backed configuration loading.
//!
//! Pure schema parsing lives in `domain::config`; this module decides where
//! values come from and in which order they win.

mod load_config;

pub use load_config::{ConfigSources, resolve_config};
