//! Configuration loading.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML file,
//! then `TAGRANK_`-prefixed environment variables with `__` as the section
//! separator (`TAGRANK_SERVER__BIND=0.0.0.0:8080`).

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::path::Path;
use tagrank_core::config::AppConfig;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "TAGRANK_";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "TAGRANK_CONFIG";

/// Build the configuration figment for `path`.
///
/// A missing file is not an error; every field has a default.
pub fn figment(path: &Path) -> Figment {
    let mut figment = Figment::new();

    if path.exists() {
        tracing::info!(config_path = %path.display(), "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}, using defaults", path.display());
    }

    figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
}

/// Extract and validate configuration from a figment.
pub fn extract(figment: &Figment) -> Result<AppConfig> {
    let config: AppConfig = figment
        .extract()
        .context("failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    Ok(config)
}

/// Load configuration from `path` and the environment.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    extract(&figment(path))
}
