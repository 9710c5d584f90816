//! Logging setup
//!
//! Logs go to stderr so stdout stays with the delegated tool.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global subscriber; `RUST_LOG` overrides the default filter
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "devcmd=debug" } else { "devcmd=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Keep an already-installed subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
