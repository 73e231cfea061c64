use anyhow::Result;
use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::schemas::AppState;
use crate::upstream::PredictionClient;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_PREDICTION_BASE_URL: &str = "https://price-prediction.aziziafrica.com";

/// Environment variables with this prefix override file settings,
/// e.g. `PRICE_FORECAST_BIND_ADDRESS`.
const ENV_PREFIX: &str = "PRICE_FORECAST";

/// Server configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Address the web server listens on (IP:PORT)
    pub bind_address: String,
    /// Base URL of the prediction service; requests go to `{base}/predict`
    pub prediction_base_url: String,
    /// Directory with the built frontend, served for every non-API path
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    /// Expose Prometheus metrics on `/metrics`
    pub metrics_enabled: bool,
}

impl AppConfig {
    /// Load defaults, then the optional config file, then `PRICE_FORECAST_*` variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Self::defaults()?;
        if let Some(path) = config_file {
            tracing::debug!("Reading configuration file {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("prediction_base_url", DEFAULT_PREDICTION_BASE_URL)?
            .set_default("metrics_enabled", false)
    }
}

/// Build the shared handler state from configuration
pub fn initialize_app_state(config: AppConfig) -> AppState {
    tracing::info!("Forwarding predictions to {}", config.prediction_base_url);
    let upstream = PredictionClient::new(&config.prediction_base_url);

    AppState {
        config: Arc::new(config),
        upstream,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AppConfig {
        AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply_without_sources() {
        let config = from_toml("");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.prediction_base_url, DEFAULT_PREDICTION_BASE_URL);
        assert_eq!(config.static_dir, None);
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = from_toml(
            r#"
            bind_address = "127.0.0.1:8080"
            prediction_base_url = "http://localhost:8000"
            static_dir = "workspace/frontend/dist"
            metrics_enabled = true
            "#,
        );
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.prediction_base_url, "http://localhost:8000");
        assert_eq!(config.static_dir, Some(PathBuf::from("workspace/frontend/dist")));
        assert!(config.metrics_enabled);
    }
}
