use crate::api_client;
use common::{ForecastRequest, ForecastResponse};

pub async fn request_forecast(request: ForecastRequest) -> Result<ForecastResponse, String> {
    log::trace!(
        "Requesting forecast for {} in {} ({}/{})",
        request.product_name,
        request.market,
        request.month,
        request.year
    );
    let result = api_client::post::<ForecastResponse, _>("/predict", &request).await;

    if let Err(ref e) = result {
        log::error!("Failed to fetch forecast: {}", e);
    } else {
        log::info!("Successfully fetched forecast for {}", request.product_name);
    }

    result
}
