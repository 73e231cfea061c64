use common::{ForecastSummary, USAGE_TIPS};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ForecastResultProps {
    pub summary: ForecastSummary,
}

#[function_component(ForecastResult)]
pub fn forecast_result(props: &ForecastResultProps) -> Html {
    let summary = &props.summary;
    log::debug!("Rendering forecast: {} -> {}", summary.headline(), summary.price);

    html! {
        <div class="card bg-base-100 shadow mt-6">
            <div class="card-body">
                <h3 class="card-title text-base">{summary.headline()}</h3>
                <p class="text-4xl font-bold text-primary">{&summary.price}</p>
                <div class="divider"></div>
                <h4 class="font-semibold">{"How to use this forecast"}</h4>
                <ul class="list-disc list-inside text-sm space-y-1">
                    { for USAGE_TIPS.iter().map(|tip| html! { <li>{*tip}</li> }) }
                </ul>
            </div>
        </div>
    }
}
