//! Logging initialization
//!
//! Sets up the tracing subscriber. Filtering follows `RUST_LOG`, defaulting
//! to `info` when unset.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Safe to call once per process; a second call reports an error instead of
/// panicking.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
