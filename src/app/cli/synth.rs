use std::path::PathBuf;

use crate::app::api::{self, DEFAULT_OUTPUT_DIR, SynthOptions};
use crate::app::config::ConfigSources;
use crate::domain::{AppError, ManifestFormat};

pub fn run_synth(
    sources: ConfigSources,
    format: &str,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<(), AppError> {
    let format: ManifestFormat = format.parse()?;
    let options = SynthOptions { sources, format, to_stdout: stdout };
    let out_dir = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let outcome = api::synth(out_dir, &options)?;

    match &outcome.path {
        Some(path) => {
            println!("✅ Synthesized {} to {}", outcome.manifest.stack_name(), path.display());
            println!("   fingerprint: {}", outcome.fingerprint);
        }
        None => {
            print!("{}", outcome.rendered);
            if !outcome.rendered.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
