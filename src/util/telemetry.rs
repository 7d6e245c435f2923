//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

use crate::config::ReinvokeConfig;

/// Initialize tracing. Users can install their own subscriber; this helper
/// installs an fmt subscriber if none is set. `RUST_LOG` wins over
/// `default_directive` when present.
///
/// Returns `true` when this call installed the subscriber.
pub fn init_tracing(default_directive: &str) -> bool {
    if tracing::dispatcher::has_been_set() {
        return false;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}

/// [`init_tracing`] with the configured `log_filter` as default directive.
pub fn init_tracing_from(config: &ReinvokeConfig) -> bool {
    init_tracing(&config.log_filter)
}
