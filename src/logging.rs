//! Tracing subscriber setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber; `RUST_LOG` wins over `default_directives`.
///
/// Safe to call more than once: later calls leave the first subscriber in place.
pub fn init_tracing(default_directives: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
