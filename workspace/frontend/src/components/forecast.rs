mod result;
mod view;

pub use view::Forecast;
