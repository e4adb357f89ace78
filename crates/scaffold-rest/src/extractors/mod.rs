//! Custom Axum extractors.

mod list_params;
mod one_or_many;
mod request;
mod validated;

pub use list_params::*;
pub use one_or_many::*;
pub use request::*;
pub use validated::*;
