//! Display formatting of a forecast result.

use chrono::Month;

use crate::catalog::{Catalog, DefaultPrices};
use crate::forecast::{ForecastRequest, ForecastResponse};

/// Unit every price is quoted in.
pub const PRICE_UNIT: &str = "KES/Kg";

/// Advice shown under every forecast.
pub const USAGE_TIPS: [&str; 4] = [
    "Use this price as a benchmark when negotiating with suppliers",
    "Plan your budget accordingly for future raw material costs",
    "Compare with current spot prices to identify potential savings",
    "Consider market trends and seasonal variations in your planning",
];

/// Full English name of a month number, `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Price rounded to two decimals with the unit, e.g. `123.40 KES/Kg`.
pub fn format_price(price: f64) -> String {
    format!("{:.2} {}", price, PRICE_UNIT)
}

/// Note listing the defaults the form falls back to. Prices print as entered, e.g. `250 KES/Kg`.
pub fn default_prices_hint(product_name: &str, defaults: &DefaultPrices) -> String {
    format!(
        "Using default prices for {product_name}: Most Recent: {} {PRICE_UNIT}, Previous Month: {} {PRICE_UNIT}, 3-Month Avg: {} {PRICE_UNIT}",
        defaults.wholesale_price_lag1,
        defaults.wholesale_price_lag2,
        defaults.wholesale_price_rolling_avg,
    )
}

/// Everything the result panel shows, already resolved to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSummary {
    pub product_name: String,
    pub market_name: String,
    pub month_name: String,
    pub year: i32,
    pub price: String,
}

impl ForecastSummary {
    pub fn new(
        catalog: &Catalog,
        response: &ForecastResponse,
        product_id: &str,
        market_id: &str,
        month: u32,
        year: i32,
    ) -> Self {
        Self {
            product_name: catalog.product_name(product_id).to_string(),
            market_name: catalog.market_name(market_id).to_string(),
            month_name: month_name(month)
                .map(str::to_string)
                .unwrap_or_else(|| month.to_string()),
            year,
            price: format_price(response.predicted_monthly_wholesale_price),
        }
    }

    /// Summary of a response for the request it answers.
    pub fn for_request(
        catalog: &Catalog,
        request: &ForecastRequest,
        response: &ForecastResponse,
    ) -> Self {
        Self::new(
            catalog,
            response,
            &request.product_name,
            &request.market,
            request.month,
            request.year,
        )
    }

    pub fn headline(&self) -> String {
        format!(
            "Predicted Wholesale Price for {} in {} around {}, {}:",
            self.product_name, self.market_name, self.month_name, self.year
        )
    }
}
