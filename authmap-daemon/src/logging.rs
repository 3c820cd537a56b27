//! Tracing setup for the daemon.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from
//! `[general] log_level`. The output format follows
//! `[general] log_format`: "json" for log shippers, "pretty" for a
//! terminal. Pipeline crates only emit through `tracing` macros; this
//! is the single place a subscriber gets installed.

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

use authmap_core::config::GeneralConfig;

/// Install the global tracing subscriber. Call once at startup,
/// before the first log line.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log_format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
