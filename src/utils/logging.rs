//! Diagnostic logging using `tracing` and `tracing-subscriber`.
//!
//! Pipeline stages log at `info`, per-column decisions (classification,
//! binning, prefix exclusions) at `debug`. Output goes to stderr so it never
//! mixes with result tables on stdout. `RUST_LOG` takes precedence over the
//! verbosity flag when set.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map the number of `-v` flags to a level.
///
/// - 0: warn (quiet by default, the CLI prints its own progress)
/// - 1: info
/// - 2: debug
/// - 3+: trace
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Call once from `main`.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let level = level_from_verbosity(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("unioutcomes={}", level.as_str().to_lowercase())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
