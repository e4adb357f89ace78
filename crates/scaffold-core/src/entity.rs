//! The contract a record type fulfils to be stored through a Dao.

use crate::{FieldValue, ScaffoldError, ScaffoldResult};
use std::fmt::Display;

/// A persistent record with an identifier and a creation timestamp.
///
/// Column access goes through [`FieldValue`] so stores can build queries,
/// evaluate filters, and apply patches without knowing the concrete type.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// Identifier type.
    type Id: Clone + Display + Into<FieldValue> + Send + Sync + 'static;

    /// Human-readable name used in messages and logs.
    const NAME: &'static str;

    /// Backing table.
    const TABLE: &'static str;

    /// Every persisted column, in insert order.
    const FIELDS: &'static [&'static str];

    /// Identifier column.
    const ID_FIELD: &'static str = "id";

    /// Creation-timestamp column, the default sort key.
    const CREATED_FIELD: &'static str = "created_at";

    /// Column stamped with the current time on every update, if any.
    const UPDATED_FIELD: Option<&'static str> = None;

    /// Returns the identifier.
    fn id(&self) -> Self::Id;

    /// Reads a column.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Writes a column.
    fn set(&mut self, field: &str, value: FieldValue) -> ScaffoldResult<()>;

    /// All column values in [`Entity::FIELDS`] order.
    fn values(&self) -> Vec<FieldValue> {
        Self::FIELDS
            .iter()
            .map(|field| self.get(field).unwrap_or(FieldValue::Null))
            .collect()
    }

    /// Whether `field` is a persisted column.
    fn has_field(field: &str) -> bool {
        Self::FIELDS.contains(&field)
    }

    /// Rejects a column name that is not persisted.
    fn ensure_field(field: &str) -> ScaffoldResult<()> {
        if Self::has_field(field) {
            Ok(())
        } else {
            Err(ScaffoldError::validation(format!(
                "unknown field '{}' for {}",
                field,
                Self::NAME
            )))
        }
    }
}
