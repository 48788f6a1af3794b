//! Subscriber setup for the binary. The library only emits events.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Debug builds log step detail, release builds only warnings and errors.
pub fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Installs a compact stderr subscriber with a fixed filter.
///
/// The filter is never read from the environment.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(default_level().as_str().to_lowercase())?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
