//! Typed ID wrappers for domain entities.

use crate::{FieldValue, Selector};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// A strongly-typed wrapper for user IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Creates a new time-ordered user ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a user ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a user ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<UserId> for FieldValue {
    fn from(id: UserId) -> Self {
        Self::Uuid(id.0)
    }
}

impl From<UserId> for Selector<UserId> {
    fn from(id: UserId) -> Self {
        Self::Id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_creation() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_user_ids_are_time_ordered() {
        let first = UserId::new();
        let second = UserId::new();
        assert!(first.into_inner() < second.into_inner());
    }

    #[test]
    fn test_user_id_parsing() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = UserId::parse(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_user_id_field_value() {
        let id = UserId::new();
        assert_eq!(FieldValue::from(id), FieldValue::Uuid(id.into_inner()));
    }

    #[test]
    fn test_user_id_selects_by_id() {
        let id = UserId::new();
        assert_eq!(Selector::from(id), Selector::Id(id));
        assert_eq!(
            Selector::from(id).into_filter("id"),
            crate::Filter::eq("id", id)
        );
    }
}
