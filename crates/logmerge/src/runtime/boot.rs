//! Boot — logging init.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a given `-v` count.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "logmerge=info",
        1 => "logmerge=debug",
        _ => "logmerge=trace",
    }
}

/// Initialise the tracing / logging subsystem.
///
/// `RUST_LOG` wins over `-v`. Output goes to stderr.
pub fn init_logging(verbose: u8) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
