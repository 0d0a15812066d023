//! Tracing subscriber setup for the binary and ad-hoc tools.

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global fmt subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// [`init_logging`] with [`DEFAULT_LOG_FILTER`].
pub fn init_default_logging() {
    init_logging(DEFAULT_LOG_FILTER);
}
