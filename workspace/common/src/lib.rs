//! Common types shared between the proxy server and the frontend.
//! The wire payloads mirror what the prediction service expects, so both
//! sides serialize the exact same shapes without duplicating definitions.

pub mod catalog;
pub mod form;
pub mod render;

mod forecast;

pub use catalog::{Catalog, County, DefaultPrices, Market, Product, BUILTIN_CATALOG};
pub use forecast::{ErrorResponse, ForecastRequest, ForecastResponse, FALLBACK_ERROR_MESSAGE};
pub use form::{FieldChange, FormErrors, FormField, ForecastForm, SubmissionState};
pub use render::{default_prices_hint, format_price, month_name, ForecastSummary, PRICE_UNIT, USAGE_TIPS};
