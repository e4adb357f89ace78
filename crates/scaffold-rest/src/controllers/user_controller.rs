//! User resource.

use crate::controllers::{crud_router, Resource};
use axum::Router;
use scaffold_core::{ScaffoldError, ScaffoldResult, User, UserDraft, UserId};
use scaffold_repository::{Dao, EntityStore};

impl Resource for User {
    type Draft = UserDraft;

    fn from_draft(draft: UserDraft) -> Self {
        Self::from(draft)
    }

    fn parse_id(raw: &str) -> ScaffoldResult<UserId> {
        UserId::parse(raw).map_err(|e| ScaffoldError::validation(format!("Invalid user ID '{}': {}", raw, e)))
    }
}

/// Creates the user router.
pub fn router<S: EntityStore<User>>(dao: Dao<User, S>) -> Router {
    crud_router(dao)
}
