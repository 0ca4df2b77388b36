use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing on stderr so logs never interleave with the transcript.
///
/// `RUST_LOG` wins over the configured default filter.
pub fn init(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();

    tracing::debug!("Tracing initialized");
}
