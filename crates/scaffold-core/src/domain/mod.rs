//! Entities served by the scaffold.

pub mod user;

pub use user::*;
