//! Stack configuration resolution.

use std::fs;
use std::path::PathBuf;

use crate::domain::config::parse_config_content;
use crate::domain::{AppError, ImageTag, StackConfig};
use crate::ports::{EnvironmentReader, IMAGE_TAG_VAR};

/// Where configuration may come from, beyond the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Optional TOML file with naming/sizing overrides.
    pub config_path: Option<PathBuf>,
    /// Explicit image tag; wins over the environment and the file.
    pub image_tag: Option<String>,
}

/// Resolve the stack configuration.
///
/// Precedence for the image tag: explicit value, then `IMAGE_TAG`, then the
/// config file, then `latest`. A set-but-empty `IMAGE_TAG` is malformed.
pub fn resolve_config<E: EnvironmentReader>(
    sources: &ConfigSources,
    env: &E,
) -> Result<StackConfig, AppError> {
    let config = match &sources.config_path {
        Some(path) => {
            if !path.is_file() {
                return Err(AppError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            let content = fs::read_to_string(path)?;
            tracing::debug!(path = %path.display(), "loaded stack config");
            parse_config_content(&content)?
        }
        None => StackConfig::default(),
    };

    let tag = if let Some(explicit) = &sources.image_tag {
        Some(explicit.clone())
    } else {
        env.var(IMAGE_TAG_VAR)?
    };

    match tag {
        Some(tag) => {
            tracing::debug!(tag = %tag, "image tag override");
            Ok(config.with_image_tag(ImageTag::new(&tag)?))
        }
        None => Ok(config),
    }
}
