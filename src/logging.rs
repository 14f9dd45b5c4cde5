//! Logging configuration using tracing

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "HEATMARK_LOG";

const DEFAULT_FILTER: &str = "heatmark=warn";

/// Initialize the logging subsystem
///
/// Logs go to stderr so rendered markup on stdout stays clean.
/// Log level is controlled by the `HEATMARK_LOG` environment variable.
///
/// # Examples
/// ```bash
/// HEATMARK_LOG=debug heatmark render --project gym
/// ```
pub fn init() {
    let env_filter = filter_from_env();

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .try_init();
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
