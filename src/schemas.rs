use common::{ErrorResponse, ForecastRequest, ForecastResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::config::AppConfig;
use crate::upstream::PredictionClient;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Configuration the server was started with
    pub config: Arc<AppConfig>,
    /// Client for the external prediction service
    pub upstream: PredictionClient,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Endpoint predictions are forwarded to
    pub prediction_service: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::predict::predict,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ForecastRequest,
            ForecastResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forecast", description = "Wholesale price forecast endpoints"),
    ),
    info(
        title = "Price Forecast API",
        description = "Relays agricultural commodity price forecast requests to the prediction service",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
