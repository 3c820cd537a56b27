//! Configuration bootstrap.
//!
//! Loads `authmap.toml`, writing a default configuration on first start
//! when the file does not exist. Environment variable overrides are
//! applied in both cases, then the result is validated.

use std::path::Path;

use tracing::warn;

use authmap_core::config::AuthmapConfig;
use authmap_core::error::{AuthmapError, ConfigError};

/// Load the configuration file, creating it with defaults if missing.
///
/// Any error other than "file not found" (unreadable file, malformed
/// TOML, invalid values) is fatal and propagated as-is.
pub async fn load_or_create_config(path: &Path) -> Result<AuthmapConfig, AuthmapError> {
    let mut config = match AuthmapConfig::from_file(path).await {
        Ok(config) => config,
        Err(AuthmapError::Config(ConfigError::FileNotFound { .. })) => {
            warn!(
                path = %path.display(),
                "config file not found; writing default configuration"
            );
            AuthmapConfig::write_default(path).await?
        }
        Err(e) => return Err(e),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
