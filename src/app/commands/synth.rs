//! Evaluate the topology and emit its manifest.

use std::path::PathBuf;

use crate::app::AppContext;
use crate::app::config::{ConfigSources, resolve_config};
use crate::domain::{AppError, Manifest, ManifestFormat, declare};
use crate::ports::{EnvironmentReader, ManifestStore};

#[derive(Debug, Clone, Default)]
pub struct SynthOptions {
    pub sources: ConfigSources,
    pub format: ManifestFormat,
    /// Return the rendered manifest instead of writing it to the store.
    pub to_stdout: bool,
}

#[derive(Debug, Clone)]
pub struct SynthOutcome {
    pub manifest: Manifest,
    pub rendered: String,
    pub fingerprint: String,
    /// Location written, when the manifest went to the store.
    pub path: Option<PathBuf>,
}

pub fn manifest_file_name(stack_name: &str, format: ManifestFormat) -> String {
    format!("{}.manifest.{}", stack_name, format.extension())
}

pub fn execute<E: EnvironmentReader, S: ManifestStore>(
    ctx: &AppContext<E, S>,
    options: &SynthOptions,
) -> Result<SynthOutcome, AppError> {
    let config = resolve_config(&options.sources, ctx.environment())?;
    let manifest = declare(&config)?;
    let rendered = manifest.render(options.format)?;
    let fingerprint = manifest.fingerprint()?;

    let path = if options.to_stdout {
        None
    } else {
        let file_name = manifest_file_name(manifest.stack_name(), options.format);
        Some(ctx.store().write_manifest(&file_name, &rendered)?)
    };

    tracing::info!(fingerprint = %fingerprint, "manifest synthesized");
    Ok(SynthOutcome { manifest, rendered, fingerprint, path })
}
