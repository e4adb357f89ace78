//! # Scaffold Server Library
//!
//! Dependency injection wiring and startup utilities for the server binary.

pub mod di;
pub mod startup;
