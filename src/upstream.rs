use common::FALLBACK_ERROR_MESSAGE;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::errors::ProxyError;

/// HTTP client for the external prediction service.
///
/// Every call is a single POST: no retries and no timeout beyond what the
/// network stack imposes.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    predict_url: String,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            predict_url: format!("{}/predict", base_url.trim_end_matches('/')),
        }
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Post `payload` unchanged and return the service's JSON answer as-is
    #[instrument(skip(self, payload), fields(url = %self.predict_url))]
    pub async fn forward(&self, payload: &Value) -> Result<Value, ProxyError> {
        trace!("Forwarding prediction request");
        let response = self.client.post(&self.predict_url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            let message =
                upstream_error_message(&body).map_err(ProxyError::InvalidUpstreamBody)?;
            debug!(%status, %message, "Prediction service rejected request");
            return Err(ProxyError::Upstream { status, message });
        }

        let prediction = response.json::<Value>().await?;
        debug!(%status, "Prediction received");
        Ok(prediction)
    }
}

/// Reason from a JSON error body: its `detail` field when present.
///
/// A string detail is used verbatim, any other JSON detail (the service's
/// validation errors are arrays) is passed on as compact JSON text. A body
/// that is not JSON at all is an error.
fn upstream_error_message(body: &[u8]) -> Result<String, serde_json::Error> {
    let body = serde_json::from_slice::<Value>(body)?;

    Ok(match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => FALLBACK_ERROR_MESSAGE.to_string(),
        Some(other) => other.to_string(),
    })
}
