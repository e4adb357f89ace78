//! User entity.

use crate::{Entity, FieldValue, ScaffoldError, ScaffoldResult, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Status assigned to drafts that do not specify one.
pub const DEFAULT_USER_STATUS: i32 = 1;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Unique username.
    pub username: String,

    /// User's email address.
    pub email: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Numeric status; `1` is active.
    pub status: i32,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user stamped with the current time.
    #[must_use]
    pub fn new(username: String, email: String, first_name: Option<String>, last_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            email,
            first_name,
            last_name,
            status: DEFAULT_USER_STATUS,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for User {
    type Id = UserId;

    const NAME: &'static str = "User";
    const TABLE: &'static str = "users";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "email",
        "first_name",
        "last_name",
        "status",
        "created_at",
        "updated_at",
    ];
    const UPDATED_FIELD: Option<&'static str> = Some("updated_at");

    fn id(&self) -> UserId {
        self.id
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "id" => self.id.into(),
            "username" => self.username.clone().into(),
            "email" => self.email.clone().into(),
            "first_name" => self.first_name.clone().into(),
            "last_name" => self.last_name.clone().into(),
            "status" => self.status.into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: FieldValue) -> ScaffoldResult<()> {
        let scoped = |e: ScaffoldError| ScaffoldError::validation(format!("field '{}': {}", field, e));
        match field {
            "id" => self.id = UserId::from_uuid(value.decode().map_err(scoped)?),
            "username" => self.username = value.decode().map_err(scoped)?,
            "email" => self.email = value.decode().map_err(scoped)?,
            "first_name" => self.first_name = value.decode().map_err(scoped)?,
            "last_name" => self.last_name = value.decode().map_err(scoped)?,
            "status" => self.status = value.decode().map_err(scoped)?,
            "created_at" => self.created_at = value.decode().map_err(scoped)?,
            "updated_at" => self.updated_at = value.decode().map_err(scoped)?,
            _ => return Self::ensure_field(field),
        }
        Ok(())
    }
}

/// Request body for creating a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserDraft {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    #[validate(length(max = 64))]
    pub last_name: Option<String>,

    pub status: Option<i32>,
}

impl From<UserDraft> for User {
    fn from(draft: UserDraft) -> Self {
        let mut user = Self::new(draft.username, draft.email, draft.first_name, draft.last_name);
        if let Some(status) = draft.status {
            user.status = status;
        }
        user
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::FromRow<'r, sqlx::mysql::MySqlRow> for User {
    fn from_row(row: &'r sqlx::mysql::MySqlRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        let id: String = row.try_get("id")?;
        let id = UserId::parse(&id).map_err(|e| sqlx::Error::ColumnDecode {
            index: "id".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn draft(username: &str, email: &str) -> UserDraft {
        UserDraft {
            username: username.to_string(),
            email: email.to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            status: None,
        }
    }

    #[test]
    fn test_user_from_draft() {
        let user = User::from(draft("ada", "ada@example.com"));
        assert_eq!(user.username, "ada");
        assert_eq!(user.status, DEFAULT_USER_STATUS);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft("ada", "ada@example.com").validate().is_ok());
        assert!(draft("ad", "ada@example.com").validate().is_err());
        assert!(draft("ada", "not-an-email").validate().is_err());
    }

    #[test]
    fn test_get_covers_every_field() {
        let user = User::from(draft("ada", "ada@example.com"));
        for field in User::FIELDS {
            assert!(user.get(field).is_some(), "missing {}", field);
        }
        assert_eq!(user.get("last_name"), Some(FieldValue::Null));
        assert!(user.get("password").is_none());
        assert_eq!(user.values().len(), User::FIELDS.len());
    }

    #[test]
    fn test_set_decodes_values() {
        let mut user = User::from(draft("ada", "ada@example.com"));
        user.set("status", FieldValue::Int(2)).unwrap();
        user.set("last_name", "Lovelace".into()).unwrap();
        user.set("first_name", FieldValue::Null).unwrap();
        user.set("updated_at", "2024-01-01T00:00:00Z".into()).unwrap();

        assert_eq!(user.status, 2);
        assert_eq!(user.last_name.as_deref(), Some("Lovelace"));
        assert!(user.first_name.is_none());
        assert_eq!(user.updated_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut user = User::from(draft("ada", "ada@example.com"));
        assert!(user.set("status", "two".into()).is_err());
        assert!(user.set("username", FieldValue::Null).is_err());
        assert!(user.set("password", "x".into()).is_err());
    }
}
