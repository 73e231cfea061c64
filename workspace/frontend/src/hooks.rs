use std::rc::Rc;

use common::{
    FieldChange, ForecastForm, ForecastRequest, ForecastResponse, FormErrors, BUILTIN_CATALOG,
};
use yew::prelude::*;

/// Events that move the forecast form forward
#[derive(Debug, Clone)]
pub enum FormAction {
    Change(FieldChange),
    Reject(FormErrors),
    Start(ForecastRequest),
    Finish(Result<ForecastResponse, String>),
}

/// Reducer state wrapping the shared form controller
#[derive(Debug, Clone, PartialEq)]
pub struct FormState(pub ForecastForm);

impl Reducible for FormState {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut form = self.0.clone();
        match action {
            FormAction::Change(change) => {
                log::trace!("Form change: {:?}", change);
                form.apply(change);
            }
            FormAction::Reject(errors) => {
                log::debug!("Form rejected with {} error(s)", errors.len());
                form.reject(errors);
            }
            FormAction::Start(request) => form.start(request),
            FormAction::Finish(outcome) => form.finish(outcome),
        }
        Rc::new(FormState(form))
    }
}

/// Forecast form state, starting at the current month
#[hook]
pub fn use_forecast_form() -> UseReducerHandle<FormState> {
    use_reducer(|| FormState(ForecastForm::starting_now(&BUILTIN_CATALOG)))
}
