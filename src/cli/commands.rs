pub mod serve;

pub use serve::{serve, ServeOverrides};
