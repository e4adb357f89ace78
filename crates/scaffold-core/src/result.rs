//! Result type aliases for the scaffold.

use crate::ScaffoldError;

/// A specialized `Result` type for storage and infrastructure operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;
