//! Log output for the CLI.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "statecraft=debug,info" } else { "warn" }
}

/// Installs a compact stderr subscriber. `RUST_LOG` wins over `verbose`.
///
/// Does nothing if a subscriber is already installed.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
