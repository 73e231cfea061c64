use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Message used when the prediction service gives no reason for a failure.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch prediction";

/// Parameters of a single monthly wholesale price forecast.
///
/// This is the body posted to `/api/predict` and forwarded unchanged to the
/// prediction service. Optional prices are left out of the JSON when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct ForecastRequest {
    /// Market id, e.g. "bungoma-town"
    #[validate(length(min = 1, message = "Please select a market"))]
    pub market: String,
    /// County id, e.g. "bungoma"
    #[validate(length(min = 1, message = "Please select a county"))]
    pub county: String,
    /// Product id, e.g. "groundnuts"
    #[validate(length(min = 1, message = "Please select a product"))]
    pub product_name: String,
    /// Target month (1-12)
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: u32,
    /// Target year (2000-2100)
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,
    /// Most recent monthly wholesale price (KES/Kg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub wholesale_price_lag1: Option<f64>,
    /// Wholesale price of the month before (KES/Kg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub wholesale_price_lag2: Option<f64>,
    /// Three month rolling average wholesale price (KES/Kg)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub wholesale_price_rolling_avg: Option<f64>,
}

/// Answer of the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    /// Predicted monthly wholesale price (KES/Kg)
    pub predicted_monthly_wholesale_price: f64,
}

/// Error body returned by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable reason
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> ForecastRequest {
        ForecastRequest {
            market: "bungoma-town".to_string(),
            county: "bungoma".to_string(),
            product_name: "groundnuts".to_string(),
            month: 6,
            year: 2025,
            wholesale_price_lag1: Some(250.0),
            wholesale_price_lag2: None,
            wholesale_price_rolling_avg: None,
        }
    }

    #[test]
    fn test_unset_prices_are_omitted() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(
            value,
            json!({
                "market": "bungoma-town",
                "county": "bungoma",
                "product_name": "groundnuts",
                "month": 6,
                "year": 2025,
                "wholesale_price_lag1": 250.0
            })
        );
    }

    #[test]
    fn test_missing_prices_deserialize_as_none() {
        let parsed: ForecastRequest = serde_json::from_value(json!({
            "market": "kimilili",
            "county": "bungoma",
            "product_name": "green-grams",
            "month": 1,
            "year": 2030
        }))
        .unwrap();
        assert_eq!(parsed.wholesale_price_rolling_avg, None);
    }

    #[test]
    fn test_validation_ranges() {
        assert!(request().validate().is_ok());

        let mut bad_month = request();
        bad_month.month = 13;
        let errors = bad_month.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("month"));

        let mut bad_year = request();
        bad_year.year = 1999;
        let errors = bad_year.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));

        let mut zero_price = request();
        zero_price.wholesale_price_lag2 = Some(0.0);
        let errors = zero_price.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("wholesale_price_lag2"));
    }

    #[test]
    fn test_empty_required_fields() {
        let mut empty = request();
        empty.market.clear();
        empty.product_name.clear();
        let errors = empty.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("market"));
        assert!(fields.contains_key("product_name"));
        assert!(!fields.contains_key("county"));
    }
}
