use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned for every failure that happens inside the proxy itself
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failures of the prediction relay
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Inbound body is not JSON
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(#[source] serde_json::Error),

    /// Prediction service could not be reached, or its answer could not be read
    #[error("Prediction service transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Prediction service error body is not JSON
    #[error("Unreadable prediction service error body: {0}")]
    InvalidUpstreamBody(#[source] serde_json::Error),

    /// Prediction service answered with a non-success status
    #[error("Prediction service returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::InvalidRequestBody(_)
            | ProxyError::InvalidUpstreamBody(_)
            | ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller; internal details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Upstream { message, .. } => message.clone(),
            ProxyError::InvalidRequestBody(_)
            | ProxyError::InvalidUpstreamBody(_)
            | ProxyError::Transport(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::Upstream { .. } => warn!(error = %self, "Relaying prediction service error"),
            _ => error!(error = %self, "Error in prediction proxy"),
        }

        let body = ErrorResponse::new(self.public_message());
        (self.status_code(), Json(body)).into_response()
    }
}
