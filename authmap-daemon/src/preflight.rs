//! Startup preflight checks.
//!
//! Verifies external prerequisites (auth log file, GeoLite database)
//! before the pipeline starts, so a misconfigured deployment fails
//! fast with a clear message instead of running an idle pipeline.

use anyhow::{Context, Result};

use authmap_core::config::AuthmapConfig;
use authmap_pipeline::MaxmindResolver;

/// Run all preflight checks and return the opened location resolver.
///
/// The GeoLite database is opened here (rather than inside the
/// pipeline) so that a missing or corrupt database aborts startup.
pub async fn run_preflight(config: &AuthmapConfig) -> Result<MaxmindResolver> {
    tokio::fs::metadata(&config.auth.path)
        .await
        .with_context(|| format!("auth log '{}' is not readable", config.auth.path))?;

    let resolver = MaxmindResolver::open(&config.geolite.path)
        .context("failed to open GeoLite database")?;

    tracing::info!(
        auth_log = %config.auth.path,
        geolite = %config.geolite.path,
        "preflight checks passed"
    );
    Ok(resolver)
}
