//! Forecast form controller.
//!
//! Holds the raw field values of the forecast page, applies the derivation
//! rules between fields and validates the whole form into a
//! [`ForecastRequest`]. Every edit goes through [`ForecastForm::apply`]:
//!
//! | change  | derived                                             |
//! |---------|-----------------------------------------------------|
//! | county  | available markets; market cleared if no longer valid |
//! | product | the three optional prices reset to product defaults |
//!
//! The controller never talks to the network itself. Submission is split in
//! [`ForecastForm::request`], [`ForecastForm::start`] and
//! [`ForecastForm::finish`] so a UI can run the request on its own executor;
//! [`ForecastForm::submit`] chains them for callers that can hold the form
//! across an await.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use chrono::Datelike;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::catalog::{Catalog, DefaultPrices, Market};
use crate::forecast::{ForecastRequest, ForecastResponse};

/// Fields of the forecast form, named after their wire keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Product,
    County,
    Market,
    Month,
    Year,
    LagPrice1,
    LagPrice2,
    RollingAverage,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Product,
        FormField::County,
        FormField::Market,
        FormField::Month,
        FormField::Year,
        FormField::LagPrice1,
        FormField::LagPrice2,
        FormField::RollingAverage,
    ];

    /// Key used in the JSON body and as the HTML input name.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Product => "product_name",
            FormField::County => "county",
            FormField::Market => "market",
            FormField::Month => "month",
            FormField::Year => "year",
            FormField::LagPrice1 => "wholesale_price_lag1",
            FormField::LagPrice2 => "wholesale_price_lag2",
            FormField::RollingAverage => "wholesale_price_rolling_avg",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Product(String),
    County(String),
    Market(String),
    Month(Option<u32>),
    Year(Option<i32>),
    LagPrice1(Option<f64>),
    LagPrice2(Option<f64>),
    RollingAverage(Option<f64>),
}

impl FieldChange {
    pub fn field(&self) -> FormField {
        match self {
            FieldChange::Product(_) => FormField::Product,
            FieldChange::County(_) => FormField::County,
            FieldChange::Market(_) => FormField::Market,
            FieldChange::Month(_) => FormField::Month,
            FieldChange::Year(_) => FormField::Year,
            FieldChange::LagPrice1(_) => FormField::LagPrice1,
            FieldChange::LagPrice2(_) => FormField::LagPrice2,
            FieldChange::RollingAverage(_) => FormField::RollingAverage,
        }
    }
}

/// Per-field validation messages. Only the first message of a field is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<FormField, String>);

impl FormErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (name, field_errors) in errors.field_errors() {
            let Some(field) = FormField::from_name(&name) else {
                warn!("Validation error for unknown field {}", name);
                continue;
            };
            if let Some(error) = field_errors.first() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.insert(field, message);
            }
        }
        form_errors
    }
}

/// Lifecycle of a forecast submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// Request in flight.
    Loading { request: ForecastRequest },
    /// The request as it was submitted, with the service's answer.
    Succeeded {
        request: ForecastRequest,
        response: ForecastResponse,
    },
    Failed(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<(&ForecastRequest, &ForecastResponse)> {
        match self {
            Self::Succeeded { request, response } => Some((request, response)),
            _ => None,
        }
    }
}

/// Field state of the forecast page.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastForm {
    catalog: &'static Catalog,
    product_name: String,
    county: String,
    market: String,
    month: Option<u32>,
    year: Option<i32>,
    wholesale_price_lag1: Option<f64>,
    wholesale_price_lag2: Option<f64>,
    wholesale_price_rolling_avg: Option<f64>,
    errors: FormErrors,
    state: SubmissionState,
}

impl ForecastForm {
    /// Empty form targeting the given month.
    pub fn new(catalog: &'static Catalog, month: u32, year: i32) -> Self {
        Self {
            catalog,
            product_name: String::new(),
            county: String::new(),
            market: String::new(),
            month: Some(month),
            year: Some(year),
            wholesale_price_lag1: None,
            wholesale_price_lag2: None,
            wholesale_price_rolling_avg: None,
            errors: FormErrors::default(),
            state: SubmissionState::Idle,
        }
    }

    /// Empty form targeting the current local month.
    pub fn starting_now(catalog: &'static Catalog) -> Self {
        let today = chrono::Local::now().date_naive();
        Self::new(catalog, today.month(), today.year())
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// The three optional prices as `(lag1, lag2, rolling_avg)`.
    pub fn prices(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        (
            self.wholesale_price_lag1,
            self.wholesale_price_lag2,
            self.wholesale_price_rolling_avg,
        )
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Apply one edit and recompute the fields that depend on it.
    pub fn apply(&mut self, change: FieldChange) {
        self.errors.remove(change.field());
        match change {
            FieldChange::Product(product) => {
                self.product_name = product;
                self.reset_prices_to_defaults();
            }
            FieldChange::County(county) => {
                self.county = county;
                self.drop_market_outside_county();
            }
            FieldChange::Market(market) => self.market = market,
            FieldChange::Month(month) => self.month = month,
            FieldChange::Year(year) => self.year = year,
            FieldChange::LagPrice1(price) => self.wholesale_price_lag1 = price,
            FieldChange::LagPrice2(price) => self.wholesale_price_lag2 = price,
            FieldChange::RollingAverage(price) => self.wholesale_price_rolling_avg = price,
        }
    }

    fn reset_prices_to_defaults(&mut self) {
        if self.product_name.is_empty() {
            return;
        }
        let defaults = self.catalog.default_prices_for(&self.product_name);
        debug!(product = %self.product_name, ?defaults, "Resetting prices to product defaults");
        self.wholesale_price_lag1 = Some(defaults.wholesale_price_lag1);
        self.wholesale_price_lag2 = Some(defaults.wholesale_price_lag2);
        self.wholesale_price_rolling_avg = Some(defaults.wholesale_price_rolling_avg);
    }

    fn drop_market_outside_county(&mut self) {
        if self.market.is_empty() {
            return;
        }
        if !self.available_markets().iter().any(|m| m.id == self.market) {
            debug!(market = %self.market, county = %self.county, "Clearing market outside county");
            self.market.clear();
        }
    }

    /// Markets the market selector offers: every known market until a county is chosen.
    pub fn available_markets(&self) -> Vec<&'static Market> {
        if self.county.is_empty() {
            self.catalog.all_markets().collect()
        } else {
            self.catalog.markets_in(&self.county).iter().collect()
        }
    }

    /// Markets can only be picked once a county is selected.
    pub fn market_selectable(&self) -> bool {
        !self.county.is_empty()
    }

    /// Defaults of the selected product, or the generic triple when none is selected.
    pub fn current_default_prices(&self) -> DefaultPrices {
        if self.product_name.is_empty() {
            self.catalog.fallback_prices
        } else {
            self.catalog.default_prices_for(&self.product_name)
        }
    }

    /// Validate the fields into a request without changing any state.
    pub fn request(&self) -> Result<ForecastRequest, FormErrors> {
        let mut errors = FormErrors::default();
        if self.month.is_none() {
            errors.insert(FormField::Month, "Please select a month");
        }
        match self.year {
            None => errors.insert(FormField::Year, "Please enter a year"),
            Some(year) if year < 2000 => errors.insert(FormField::Year, "Year must be after 2000"),
            Some(year) if year > 2100 => errors.insert(FormField::Year, "Year must be before 2100"),
            Some(_) => {}
        }
        // Non-finite values would serialize as null
        for (field, price) in [
            (FormField::LagPrice1, self.wholesale_price_lag1),
            (FormField::LagPrice2, self.wholesale_price_lag2),
            (FormField::RollingAverage, self.wholesale_price_rolling_avg),
        ] {
            if price.is_some_and(|p| !p.is_finite()) {
                errors.insert(field, "Please enter a valid price");
            }
        }

        let request = ForecastRequest {
            market: self.market.clone(),
            county: self.county.clone(),
            product_name: self.product_name.clone(),
            month: self.month.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            wholesale_price_lag1: self.wholesale_price_lag1,
            wholesale_price_lag2: self.wholesale_price_lag2,
            wholesale_price_rolling_avg: self.wholesale_price_rolling_avg,
        };

        if let Err(validation) = request.validate() {
            for (field, message) in FormErrors::from(validation).iter() {
                errors.insert(field, message);
            }
        }

        if !errors.contains(FormField::Market)
            && !errors.contains(FormField::County)
            && !self.catalog.county_has_market(&request.county, &request.market)
        {
            errors.insert(FormField::Market, "Market is not in the selected county");
        }

        if errors.is_empty() {
            Ok(request)
        } else {
            debug!(count = errors.len(), "Forecast form rejected");
            Err(errors)
        }
    }

    /// Record validation failures; the submission state is left as it was.
    pub fn reject(&mut self, errors: FormErrors) {
        self.errors = errors;
    }

    /// Enter the loading state for a validated request.
    pub fn start(&mut self, request: ForecastRequest) {
        self.errors = FormErrors::default();
        self.state = SubmissionState::Loading { request };
    }

    /// Settle the in-flight request. Ignored when nothing is in flight.
    pub fn finish(&mut self, outcome: Result<ForecastResponse, String>) {
        if !self.state.is_loading() {
            warn!("Forecast outcome received with no request in flight");
            return;
        }
        let SubmissionState::Loading { request } = std::mem::take(&mut self.state) else {
            return;
        };
        self.state = match outcome {
            Ok(response) => SubmissionState::Succeeded { request, response },
            Err(message) => SubmissionState::Failed(message),
        };
    }

    /// Validate, send through `send` and record the outcome.
    ///
    /// `send` is not called when validation fails.
    pub async fn submit<F, Fut>(&mut self, send: F) -> &SubmissionState
    where
        F: FnOnce(ForecastRequest) -> Fut,
        Fut: Future<Output = Result<ForecastResponse, String>>,
    {
        match self.request() {
            Ok(request) => {
                self.start(request.clone());
                let outcome = send(request).await;
                self.finish(outcome);
            }
            Err(errors) => self.reject(errors),
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BUILTIN_CATALOG;
    use futures::executor::block_on;
    use std::cell::Cell;

    fn form() -> ForecastForm {
        ForecastForm::new(&BUILTIN_CATALOG, 6, 2025)
    }

    fn filled_form() -> ForecastForm {
        let mut form = form();
        form.apply(FieldChange::Product("groundnuts".to_string()));
        form.apply(FieldChange::County("bungoma".to_string()));
        form.apply(FieldChange::Market("kimilili".to_string()));
        form
    }

    fn ids(markets: Vec<&Market>) -> Vec<&str> {
        markets.into_iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_initial_state() {
        let form = form();
        assert_eq!(form.month(), Some(6));
        assert_eq!(form.year(), Some(2025));
        assert_eq!(form.prices(), (None, None, None));
        assert!(!form.market_selectable());
        assert_eq!(form.available_markets().len(), 25);
        assert_eq!(form.state(), &SubmissionState::Idle);
    }

    #[test]
    fn test_county_selects_exactly_its_markets() {
        for county in BUILTIN_CATALOG.counties {
            let mut form = form();
            form.apply(FieldChange::County(county.id.to_string()));
            let expected: Vec<&str> = county.markets.iter().map(|m| m.id).collect();
            assert_eq!(ids(form.available_markets()), expected, "county {}", county.id);
            assert!(form.market_selectable());
        }
    }

    #[test]
    fn test_unknown_county_has_no_markets() {
        let mut form = form();
        form.apply(FieldChange::County("nairobi".to_string()));
        assert!(form.available_markets().is_empty());
    }

    #[test]
    fn test_county_change_clears_foreign_market() {
        let mut form = filled_form();
        form.apply(FieldChange::County("kisumu".to_string()));
        assert_eq!(form.market(), "");
    }

    #[test]
    fn test_county_change_keeps_market_in_new_set() {
        let mut form = filled_form();
        form.apply(FieldChange::County("bungoma".to_string()));
        assert_eq!(form.market(), "kimilili");
    }

    #[test]
    fn test_product_sets_its_default_prices() {
        for (product, defaults) in BUILTIN_CATALOG.default_prices {
            let mut form = form();
            form.apply(FieldChange::Product(product.to_string()));
            assert_eq!(
                form.prices(),
                (
                    Some(defaults.wholesale_price_lag1),
                    Some(defaults.wholesale_price_lag2),
                    Some(defaults.wholesale_price_rolling_avg)
                )
            );
        }
    }

    #[test]
    fn test_unmapped_product_uses_fallback_prices() {
        let mut form = form();
        form.apply(FieldChange::Product("millet".to_string()));
        assert_eq!(form.prices(), (Some(100.0), Some(95.0), Some(97.5)));
        assert_eq!(form.current_default_prices(), BUILTIN_CATALOG.fallback_prices);
    }

    #[test]
    fn test_product_change_overwrites_user_prices() {
        let mut form = filled_form();
        form.apply(FieldChange::LagPrice1(Some(310.0)));
        form.apply(FieldChange::RollingAverage(None));
        form.apply(FieldChange::Product("green-grams".to_string()));
        assert_eq!(form.prices(), (Some(125.0), Some(125.0), Some(125.0)));
    }

    #[test]
    fn test_clearing_product_keeps_prices() {
        let mut form = filled_form();
        form.apply(FieldChange::Product(String::new()));
        assert_eq!(form.prices(), (Some(250.0), Some(220.0), Some(243.0)));
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = filled_form().request().unwrap();
        assert_eq!(request.market, "kimilili");
        assert_eq!(request.product_name, "groundnuts");
        assert_eq!(request.month, 6);
        assert_eq!(request.wholesale_price_rolling_avg, Some(243.0));
    }

    #[test]
    fn test_missing_fields_report_messages() {
        let mut form = form();
        form.apply(FieldChange::Month(None));
        form.apply(FieldChange::Year(None));
        let errors = form.request().unwrap_err();
        assert_eq!(errors.get(FormField::Product), Some("Please select a product"));
        assert_eq!(errors.get(FormField::County), Some("Please select a county"));
        assert_eq!(errors.get(FormField::Market), Some("Please select a market"));
        assert_eq!(errors.get(FormField::Month), Some("Please select a month"));
        assert_eq!(errors.get(FormField::Year), Some("Please enter a year"));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut form = filled_form();
        form.apply(FieldChange::LagPrice2(Some(-5.0)));
        let errors = form.request().unwrap_err();
        assert_eq!(errors.get(FormField::LagPrice2), Some("Price must be positive"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_market_must_belong_to_county() {
        let mut form = filled_form();
        form.apply(FieldChange::County("kisumu".to_string()));
        // bypass the selector, as a hand-edited request would
        form.market = "kimilili".to_string();
        let errors = form.request().unwrap_err();
        assert_eq!(
            errors.get(FormField::Market),
            Some("Market is not in the selected county")
        );
    }

    #[test]
    fn test_out_of_range_month_never_reaches_network() {
        let calls = Cell::new(0);
        let mut form = filled_form();
        form.apply(FieldChange::Month(Some(13)));

        let state = block_on(form.submit(|_| {
            calls.set(calls.get() + 1);
            async { Ok(ForecastResponse { predicted_monthly_wholesale_price: 1.0 }) }
        }))
        .clone();

        assert_eq!(calls.get(), 0);
        assert_eq!(state, SubmissionState::Idle);
        assert_eq!(
            form.errors().get(FormField::Month),
            Some("Month must be between 1 and 12")
        );
    }

    #[test]
    fn test_out_of_range_year_never_reaches_network() {
        let calls = Cell::new(0);
        let mut form = filled_form();
        form.apply(FieldChange::Year(Some(1999)));

        block_on(form.submit(|_| {
            calls.set(calls.get() + 1);
            async { Err("unreachable".to_string()) }
        }));

        assert_eq!(calls.get(), 0);
        assert!(form.errors().contains(FormField::Year));
        assert!(form.state().error().is_none());
    }

    #[test]
    fn test_successful_submit_keeps_request_snapshot() {
        let mut form = filled_form();
        block_on(form.submit(|request| async move {
            assert_eq!(request.market, "kimilili");
            Ok(ForecastResponse { predicted_monthly_wholesale_price: 123.4 })
        }));

        // later edits do not change what was submitted
        form.apply(FieldChange::Market("webuye".to_string()));

        let (request, response) = form.state().result().unwrap();
        assert_eq!(request.market, "kimilili");
        assert_eq!(response.predicted_monthly_wholesale_price, 123.4);
    }

    #[test]
    fn test_failed_submit_records_message() {
        let mut form = filled_form();
        block_on(form.submit(|_| async { Err("bad market".to_string()) }));
        assert_eq!(form.state().error(), Some("bad market"));
        assert!(!form.state().is_loading());
    }

    #[test]
    fn test_start_and_finish_lifecycle() {
        let mut form = filled_form();
        let request = form.request().unwrap();
        form.start(request);
        assert!(form.state().is_loading());

        form.finish(Ok(ForecastResponse { predicted_monthly_wholesale_price: 99.0 }));
        assert!(form.state().result().is_some());

        // a stray outcome with nothing in flight is dropped
        form.finish(Err("late".to_string()));
        assert!(form.state().result().is_some());
    }

    #[test]
    fn test_year_bounds_have_their_own_messages() {
        let mut form = filled_form();
        form.apply(FieldChange::Year(Some(1999)));
        let errors = form.request().unwrap_err();
        assert_eq!(errors.get(FormField::Year), Some("Year must be after 2000"));

        form.apply(FieldChange::Year(Some(2101)));
        let errors = form.request().unwrap_err();
        assert_eq!(errors.get(FormField::Year), Some("Year must be before 2100"));

        form.apply(FieldChange::Year(Some(2100)));
        assert!(form.request().is_ok());
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let mut form = filled_form();
        form.apply(FieldChange::LagPrice1("1e400".parse().ok()));
        assert_eq!(form.prices().0, Some(f64::INFINITY));

        let errors = form.request().unwrap_err();
        assert_eq!(errors.get(FormField::LagPrice1), Some("Please enter a valid price"));

        form.apply(FieldChange::RollingAverage(Some(f64::NAN)));
        let errors = form.request().unwrap_err();
        assert!(errors.contains(FormField::RollingAverage));
    }

    #[test]
    fn test_stray_outcome_keeps_failure() {
        let mut form = filled_form();
        block_on(form.submit(|_| async { Err("bad market".to_string()) }));

        form.finish(Ok(ForecastResponse { predicted_monthly_wholesale_price: 1.0 }));
        assert_eq!(form.state().error(), Some("bad market"));

        let mut idle = filled_form();
        idle.finish(Err("late".to_string()));
        assert_eq!(idle.state(), &SubmissionState::Idle);
    }

    #[test]
    fn test_edit_clears_field_error() {
        let mut form = form();
        let errors = form.request().unwrap_err();
        form.reject(errors);
        assert!(form.errors().contains(FormField::Product));

        form.apply(FieldChange::Product("groundnuts".to_string()));
        assert!(!form.errors().contains(FormField::Product));
        assert!(form.errors().contains(FormField::County));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(FormField::from_name(field.name()), Some(field));
        }
    }
}
