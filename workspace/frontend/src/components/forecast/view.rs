use std::str::FromStr;

use common::{
    default_prices_hint, month_name, FieldChange, ForecastForm, ForecastSummary, FormField,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::result::ForecastResult;
use crate::api_client::forecast::request_forecast;
use crate::common::{error::ErrorDisplay, loading::Loading};
use crate::hooks::{use_forecast_form, FormAction};

fn select_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

fn input_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

/// Empty input means "not provided"
fn parse_optional<T: FromStr>(value: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}

fn field_error(form: &ForecastForm, field: FormField) -> Html {
    match form.errors().get(field) {
        Some(message) => html! {
            <label class="label">
                <span class="label-text-alt text-error">{message}</span>
            </label>
        },
        None => html! {},
    }
}

fn input_class(form: &ForecastForm, field: FormField, base: &'static str) -> Classes {
    classes!(base, "w-full", form.errors().contains(field).then_some("input-error"))
}

fn price_value(price: Option<f64>) -> String {
    price.map(|p| p.to_string()).unwrap_or_default()
}

#[function_component(Forecast)]
pub fn forecast() -> Html {
    let form = use_forecast_form();
    let show_advanced = use_state(|| false);

    let on_select = |make: fn(String) -> FieldChange| {
        let form = form.clone();
        Callback::from(move |e: Event| form.dispatch(FormAction::Change(make(select_value(&e)))))
    };
    let on_input = |make: fn(&str) -> FieldChange| {
        let form = form.clone();
        Callback::from(move |e: Event| form.dispatch(FormAction::Change(make(&input_value(&e)))))
    };

    let on_product = on_select(FieldChange::Product);
    let on_county = on_select(FieldChange::County);
    let on_market = on_select(FieldChange::Market);
    let on_month = on_select(|v| FieldChange::Month(parse_optional(&v)));
    let on_year = on_input(|v: &str| FieldChange::Year(parse_optional(v)));
    let on_lag1 = on_input(|v: &str| FieldChange::LagPrice1(parse_optional(v)));
    let on_lag2 = on_input(|v: &str| FieldChange::LagPrice2(parse_optional(v)));
    let on_rolling = on_input(|v: &str| FieldChange::RollingAverage(parse_optional(v)));

    let on_toggle_advanced = {
        let show_advanced = show_advanced.clone();
        Callback::from(move |_: MouseEvent| show_advanced.set(!*show_advanced))
    };

    let on_submit = {
        let form = form.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if form.0.state().is_loading() {
                return;
            }

            match form.0.request() {
                Err(errors) => form.dispatch(FormAction::Reject(errors)),
                Ok(request) => {
                    form.dispatch(FormAction::Start(request.clone()));
                    let form = form.clone();
                    spawn_local(async move {
                        log::info!("Submitting forecast for {}", request.product_name);
                        let outcome = request_forecast(request).await;
                        form.dispatch(FormAction::Finish(outcome));
                    });
                }
            }
        })
    };

    let state = &form.0;
    let catalog = state.catalog();
    let is_loading = state.state().is_loading();
    let (lag1, lag2, rolling) = state.prices();

    let defaults = state.current_default_prices();
    let product_label = if state.product_name().is_empty() {
        "this product"
    } else {
        catalog.product_name(state.product_name())
    };

    let default_hint = if state.product_name().is_empty() || *show_advanced {
        html! {}
    } else {
        html! {
            <p class="text-sm text-gray-500 mt-2">
                {default_prices_hint(product_label, &defaults)}
            </p>
        }
    };

    let outcome = if is_loading {
        html! { <Loading text={Some("Fetching price prediction...".to_string())} /> }
    } else if let Some(message) = state.state().error() {
        html! { <ErrorDisplay message={message.to_string()} /> }
    } else if let Some((request, response)) = state.state().result() {
        let summary = ForecastSummary::for_request(catalog, request, response);
        html! { <ForecastResult {summary} /> }
    } else {
        html! {}
    };

    html! {
        <div class="max-w-2xl mx-auto">
            <div class="card bg-base-100 shadow">
                <form class="card-body space-y-2" onsubmit={on_submit} novalidate={true}>
                    <h2 class="card-title">{"Wholesale Price Forecast"}</h2>

                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Product"}</span></label>
                        <select class={input_class(state, FormField::Product, "select select-bordered")} onchange={on_product}>
                            <option value="" selected={state.product_name().is_empty()}>{"Select a product"}</option>
                            { for catalog.offered_products().map(|p| html! {
                                <option value={p.id} selected={p.id == state.product_name()}>{p.name}</option>
                            }) }
                        </select>
                        {field_error(state, FormField::Product)}
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">{"County"}</span></label>
                            <select class={input_class(state, FormField::County, "select select-bordered")} onchange={on_county}>
                                <option value="" selected={state.county().is_empty()}>{"Select a county"}</option>
                                { for catalog.offered_counties().map(|c| html! {
                                    <option value={c.id} selected={c.id == state.county()}>{c.name}</option>
                                }) }
                            </select>
                            {field_error(state, FormField::County)}
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">{"Market"}</span></label>
                            <select
                                class={input_class(state, FormField::Market, "select select-bordered")}
                                onchange={on_market}
                                disabled={!state.market_selectable()}
                            >
                                <option value="" selected={state.market().is_empty()}>
                                    {if state.market_selectable() { "Select a market" } else { "Please select a county first" }}
                                </option>
                                { for state.available_markets().into_iter().map(|m| html! {
                                    <option value={m.id} selected={m.id == state.market()}>{m.name}</option>
                                }) }
                            </select>
                            {field_error(state, FormField::Market)}
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">{"Month"}</span></label>
                            <select class={input_class(state, FormField::Month, "select select-bordered")} onchange={on_month}>
                                <option value="" selected={state.month().is_none()}>{"Select a month"}</option>
                                { for (1..=12u32).map(|m| html! {
                                    <option value={m.to_string()} selected={state.month() == Some(m)}>
                                        {month_name(m).unwrap_or_default()}
                                    </option>
                                }) }
                            </select>
                            {field_error(state, FormField::Month)}
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">{"Year"}</span></label>
                            <input
                                type="number"
                                min="2000"
                                max="2100"
                                class={input_class(state, FormField::Year, "input input-bordered")}
                                value={state.year().map(|y| y.to_string()).unwrap_or_default()}
                                onchange={on_year}
                            />
                            {field_error(state, FormField::Year)}
                        </div>
                    </div>

                    {default_hint}

                    <div class="divider my-0"></div>
                    <button type="button" class="btn btn-ghost btn-sm self-start text-success" onclick={on_toggle_advanced}>
                        {if *show_advanced {
                            html! { <><i class="fas fa-chevron-up"></i>{" Hide Advanced Price Information"}</> }
                        } else {
                            html! { <><i class="fas fa-chevron-down"></i>{" Show Advanced Price Information (Optional)"}</> }
                        }}
                    </button>

                    {if *show_advanced {
                        html! {
                            <div>
                            <h3 class="font-medium mb-2">{"Price Information (Optional)"}</h3>
                            <p class="text-sm text-gray-500 mb-3">
                                {format!(
                                    "Default values for {} are pre-filled. You can adjust these values if you have more accurate recent price data.",
                                    product_label
                                )}
                            </p>
                            <div class="grid grid-cols-3 gap-4">
                                <div class="form-control">
                                    <label class="label"><span class="label-text">{"Most Recent Price (KES/Kg)"}</span></label>
                                    <input
                                        type="number"
                                        step="0.01"
                                        class={input_class(state, FormField::LagPrice1, "input input-bordered")}
                                        value={price_value(lag1)}
                                        placeholder={format!("e.g., {}", defaults.wholesale_price_lag1)}
                                        onchange={on_lag1}
                                    />
                                    {field_error(state, FormField::LagPrice1)}
                                </div>
                                <div class="form-control">
                                    <label class="label"><span class="label-text">{"Previous Month Price (KES/Kg)"}</span></label>
                                    <input
                                        type="number"
                                        step="0.01"
                                        class={input_class(state, FormField::LagPrice2, "input input-bordered")}
                                        value={price_value(lag2)}
                                        placeholder={format!("e.g., {}", defaults.wholesale_price_lag2)}
                                        onchange={on_lag2}
                                    />
                                    {field_error(state, FormField::LagPrice2)}
                                </div>
                                <div class="form-control">
                                    <label class="label"><span class="label-text">{"3-Month Average (KES/Kg)"}</span></label>
                                    <input
                                        type="number"
                                        step="0.01"
                                        class={input_class(state, FormField::RollingAverage, "input input-bordered")}
                                        value={price_value(rolling)}
                                        placeholder={format!("e.g., {}", defaults.wholesale_price_rolling_avg)}
                                        onchange={on_rolling}
                                    />
                                    {field_error(state, FormField::RollingAverage)}
                                </div>
                            </div>
                            </div>
                        }
                    } else {
                        html! {}
                    }}

                    <div class="card-actions justify-end">
                        <button type="submit" class="btn btn-primary" disabled={is_loading}>
                            {if is_loading {
                                html! { <><span class="loading loading-spinner loading-sm"></span>{" Predicting..."}</> }
                            } else {
                                html! { "Get Price Forecast" }
                            }}
                        </button>
                    </div>
                </form>
            </div>

            {outcome}
        </div>
    }
}
