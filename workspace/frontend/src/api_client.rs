pub mod forecast;

use common::{ErrorResponse, FALLBACK_ERROR_MESSAGE};
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use crate::settings;

fn api_url(endpoint: &str) -> String {
    settings::get_settings().api_url(endpoint)
}

/// POST a JSON body and decode the JSON answer.
///
/// The error is the message to show the user: the proxy's `error` field, or
/// the generic fallback when there is none.
pub async fn post<T, B>(endpoint: &str, body: &B) -> Result<T, String>
where
    T: for<'de> Deserialize<'de>,
    B: Serialize,
{
    let url = api_url(endpoint);
    log::debug!("POST request to: {}", url);

    let response = Request::post(&url)
        .json(body)
        .map_err(|e| {
            log::error!("POST {} - Failed to serialize request: {}", endpoint, e);
            FALLBACK_ERROR_MESSAGE.to_string()
        })?
        .send()
        .await
        .map_err(|e| {
            log::error!("POST {} - Request failed: {}", endpoint, e);
            FALLBACK_ERROR_MESSAGE.to_string()
        })?;

    if !response.ok() {
        log::warn!("POST {} - Non-OK response: {}", endpoint, response.status());
        let error_response: Result<ErrorResponse, _> = response.json().await;
        return Err(match error_response {
            Ok(err) if !err.error.is_empty() => {
                log::error!("POST {} - API error: {}", endpoint, err.error);
                err.error
            }
            _ => {
                log::error!("POST {} - HTTP error: {}", endpoint, response.status());
                FALLBACK_ERROR_MESSAGE.to_string()
            }
        });
    }

    log::trace!("POST {} - Response received, parsing JSON", endpoint);
    let data: T = response.json().await.map_err(|e| {
        log::error!("POST {} - Failed to parse response: {}", endpoint, e);
        FALLBACK_ERROR_MESSAGE.to_string()
    })?;

    log::info!("POST {} - Success", endpoint);
    Ok(data)
}
