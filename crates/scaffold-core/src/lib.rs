//! # Scaffold Core
//!
//! Core types, traits, and error definitions for the CRUD scaffold.
//! Everything here is storage-agnostic: the result envelope, filters,
//! paging, the entity contract, and the injected logger.

pub mod domain;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod id;
pub mod logging;
pub mod pagination;
pub mod result;
pub mod selector;
pub mod validation;
pub mod value;

pub use domain::*;
pub use entity::*;
pub use envelope::*;
pub use error::*;
pub use filter::*;
pub use id::*;
pub use logging::*;
pub use pagination::*;
pub use result::*;
pub use selector::*;
pub use validation::*;
pub use value::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
