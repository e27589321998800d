//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize a human-readable tracing subscriber writing to stderr.
///
/// Respects the `RUST_LOG` environment variable for filtering and falls back
/// to `default_level` when it is unset. Calling this twice is harmless: the
/// second installation attempt is ignored.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
