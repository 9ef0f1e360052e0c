use tracing_subscriber::{fmt, EnvFilter};

/// Level used when `RUST_LOG` is unset; keeps stdout free for the summary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs the global subscriber. Diagnostics go to stderr.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)); // Default to warn if RUST_LOG is not set
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
