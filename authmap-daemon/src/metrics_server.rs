//! Prometheus scrape endpoint.
//!
//! When `[metrics] enabled = true`, the daemon exposes the pipeline
//! counters (`authmap_*_total`) over HTTP via the exporter's built-in
//! listener, scrapeable at `/metrics`.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;

use authmap_core::config::MetricsConfig;

/// Bind the scrape listener and install the global metrics recorder.
///
/// Counter descriptions are registered right after installation so the
/// first scrape already carries HELP text. Fails when the address
/// cannot be bound or a recorder is already installed; call once per
/// process.
pub fn install_metrics_recorder(config: &MetricsConfig) -> Result<()> {
    let addr = scrape_addr(config)?;
    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "metrics listener bound on all interfaces; restrict listen_addr in untrusted networks"
        );
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .with_context(|| format!("failed to start metrics listener on {addr}"))?;
    authmap_core::metrics::describe_all();

    tracing::info!(listen_addr = %addr, "metrics scrape endpoint ready");
    Ok(())
}

/// Resolve the configured listen address. The address must be an IP
/// literal; hostnames are rejected rather than resolved.
fn scrape_addr(config: &MetricsConfig) -> Result<SocketAddr> {
    let ip: IpAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid metrics listen_addr '{}'", config.listen_addr))?;
    Ok(SocketAddr::new(ip, config.port))
}
