//! Evaluate the topology without writing anything.

use crate::app::config::{ConfigSources, resolve_config};
use crate::domain::{AppError, declare};
use crate::ports::EnvironmentReader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub stack_name: String,
    pub image: String,
    pub resources: usize,
    pub grants: usize,
    pub outputs: usize,
    pub fingerprint: String,
}

pub fn execute<E: EnvironmentReader>(
    sources: &ConfigSources,
    env: &E,
) -> Result<ValidateOutcome, AppError> {
    let config = resolve_config(sources, env)?;
    let image = config.image_reference()?.to_string();
    let manifest = declare(&config)?;

    Ok(ValidateOutcome {
        stack_name: manifest.stack_name().to_string(),
        image,
        resources: manifest.resources().len(),
        grants: manifest.grants().len(),
        outputs: manifest.outputs().len(),
        fingerprint: manifest.fingerprint()?,
    })
}
