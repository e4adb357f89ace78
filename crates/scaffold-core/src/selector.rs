//! Row selectors accepted by `read`, `update` and `delete`.

use crate::Filter;

/// Which rows a call targets.
///
/// Identifiers are normalized to filters on the entity's identifier column.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector<Id> {
    /// A single identifier.
    Id(Id),
    /// Any of several identifiers.
    Ids(Vec<Id>),
    /// An arbitrary filter.
    Filter(Filter),
}

impl<Id: Into<crate::FieldValue>> Selector<Id> {
    /// Converts the selector into a filter over `id_field`.
    #[must_use]
    pub fn into_filter(self, id_field: &str) -> Filter {
        match self {
            Self::Id(id) => Filter::eq(id_field, id),
            Self::Ids(ids) => Filter::one_of(id_field, ids),
            Self::Filter(filter) => filter,
        }
    }
}

impl<Id> From<Filter> for Selector<Id> {
    fn from(filter: Filter) -> Self {
        Self::Filter(filter)
    }
}

impl<Id> From<Vec<Id>> for Selector<Id> {
    fn from(ids: Vec<Id>) -> Self {
        Self::Ids(ids)
    }
}
