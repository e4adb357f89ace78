//! REST API controllers.

pub mod crud_controller;
pub mod health_controller;
pub mod user_controller;

pub use crud_controller::*;
pub use health_controller::*;
