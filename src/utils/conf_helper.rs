use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;
use tracing::{debug, info};

use crate::core::error::{PlotError, Result};
use crate::models::config_model::RenderConfig;

/// Picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fieldplot.json";

static CONFIG_CACHE: OnceLock<RenderConfig> = OnceLock::new();

fn validate(config: &RenderConfig) -> Result<()> {
    if config.figure.width == 0 || config.figure.height == 0 {
        return Err(PlotError::Config(format!(
            "figure size must be non-zero, got {}x{}",
            config.figure.width, config.figure.height
        )));
    }
    if config.time_precision > 17 {
        return Err(PlotError::Config(format!(
            "time_precision {} exceeds f64 precision",
            config.time_precision
        )));
    }
    Ok(())
}

pub async fn load_config_file(path: &Path) -> Result<RenderConfig> {
    let data = fs::read_to_string(path)
        .await
        .map_err(|e| PlotError::Config(format!("File read Error: {e} {}", path.display())))?;

    let config: RenderConfig = serde_json::from_str(&data)?;
    validate(&config)?;

    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// An explicit path must exist; otherwise `fieldplot.json` is used when
/// present, and defaults when not.
pub async fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    if let Some(path) = path {
        return load_config_file(path).await;
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fs::try_exists(fallback).await.unwrap_or(false) {
        return load_config_file(fallback).await;
    }

    Ok(RenderConfig::default())
}

pub async fn init_config(path: Option<&Path>) -> Result<&'static RenderConfig> {
    let config = load_config(path).await?;

    CONFIG_CACHE
        .set(config)
        .map_err(|_| PlotError::Config("Config already initialized".to_string()))?;

    let config = get_cached_config();
    info!(
        "Config initialized: {}x{} figure, {:?} colormap",
        config.figure.width, config.figure.height, config.colormap
    );
    Ok(config)
}

/// Cached config, or defaults if `init_config` has not run.
pub fn get_cached_config() -> &'static RenderConfig {
    CONFIG_CACHE.get_or_init(RenderConfig::default)
}
