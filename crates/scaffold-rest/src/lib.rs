//! # Scaffold REST
//!
//! REST API layer using Axum for the CRUD scaffold.
//! Mounts a generic CRUD controller per entity plus health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
