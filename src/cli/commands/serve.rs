use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state, AppConfig};
use crate::router::create_router;

/// Command line values that take precedence over the loaded configuration
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub bind_address: Option<String>,
    pub prediction_url: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub metrics: bool,
}

impl ServeOverrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(bind_address) = self.bind_address {
            config.bind_address = bind_address;
        }
        if let Some(prediction_url) = self.prediction_url {
            config.prediction_base_url = prediction_url;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = Some(static_dir);
        }
        if self.metrics {
            config.metrics_enabled = true;
        }
    }
}

pub async fn serve(config_file: Option<&Path>, overrides: ServeOverrides) -> Result<()> {
    trace!("Entering serve function");
    info!("Price forecast server starting up");

    let mut config = match AppConfig::load(config_file) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    overrides.apply(&mut config);
    debug!("Effective configuration: {:?}", config);

    let bind_address = config.bind_address.clone();

    // Initialize application state
    trace!("Initializing application state");
    let state = initialize_app_state(config);

    // Create router
    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Price forecast server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
