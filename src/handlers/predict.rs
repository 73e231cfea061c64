use axum::{body::Bytes, extract::State, response::Json};
use common::{ErrorResponse, ForecastRequest, ForecastResponse};
use serde_json::Value;
use tracing::{debug, info, instrument, trace};

use crate::errors::ProxyError;
use crate::schemas::AppState;

/// Forward a forecast request to the prediction service
///
/// The body is relayed unchanged. A success returns the service's JSON as-is;
/// a service error keeps its status code and `detail` message.
#[utoipa::path(
    post,
    path = "/api/predict",
    tag = "forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Forecast produced by the prediction service", body = ForecastResponse),
        (status = 400, description = "Prediction service rejected the request", body = ErrorResponse),
        (status = 422, description = "Prediction service could not validate the request", body = ErrorResponse),
        (status = 500, description = "Proxy failure or unreachable prediction service", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    trace!("Entering predict function");

    let payload: Value = serde_json::from_slice(&body).map_err(ProxyError::InvalidRequestBody)?;
    debug!(
        product = ?payload.get("product_name"),
        market = ?payload.get("market"),
        "Relaying forecast request"
    );

    let prediction = state.upstream.forward(&payload).await?;

    info!("Forecast relayed successfully");
    Ok(Json(prediction))
}
