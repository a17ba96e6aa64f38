//! Diagnostic logging setup.

use tracing_subscriber::{EnvFilter, prelude::*};

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Stdout stays reserved for command output such as `synth --stdout`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(env_filter))
        .try_init();
}
