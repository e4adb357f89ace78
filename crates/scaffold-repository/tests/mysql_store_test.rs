//! Integration tests for the Dao over `MySqlStore`.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker; run with `cargo test -- --ignored`.

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::TestDatabase;
use scaffold_core::{
    FieldValue, Filter, ListQuery, Logger, Patch, ResultCode, SortOrder, TracingLogger, User, UserDraft, UserId,
};
use scaffold_repository::{Dao, MySqlStore};
use std::sync::Arc;

type UserDao = Dao<User, MySqlStore<User>>;

fn dao(db: &TestDatabase) -> UserDao {
    Dao::new(
        Arc::new(MySqlStore::new(db.pool())),
        Arc::new(TracingLogger::new()) as Arc<dyn Logger>,
    )
}

fn create_test_user(username: &str, status: i32) -> User {
    User::from(UserDraft {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        first_name: Some("Test".to_string()),
        last_name: None,
        status: Some(status),
    })
}

fn timeline(n: u32) -> Vec<User> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let mut user = create_test_user(&format!("user{:02}", i), 1 + (i % 3) as i32);
            user.created_at = base + Duration::minutes(i64::from(i));
            user.updated_at = user.created_at;
            user
        })
        .collect()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_read_round_trip() {
    let db = TestDatabase::new().await;
    let dao = dao(&db);

    let user = create_test_user("testuser", 1);
    let created = dao.create(user.clone(), None).await;
    assert_eq!(created.code(), ResultCode::Created);

    let found = dao.read(created.into_result().unwrap(), None).await;
    assert_eq!(found.code(), ResultCode::Success);
    let found = found.into_result().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.username, "testuser");
    assert_eq!(found.first_name.as_deref(), Some("Test"));
    assert!(found.last_name.is_none());

    let missing = dao.read(UserId::new(), None).await;
    assert_eq!(missing.code(), ResultCode::NotFound);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_paging_counts_and_filters() {
    let db = TestDatabase::new().await;
    let dao = dao(&db);
    assert_eq!(dao.create_many(timeline(25), None).await.code(), ResultCode::Created);

    let page = dao.read_many(ListQuery::new().page(2, 10), None).await;
    assert_eq!(page.count, Some(25));
    let names: Vec<_> = page.result().unwrap().iter().map(|u| u.username.clone()).collect();
    let expected: Vec<_> = (5..15).rev().map(|i| format!("user{:02}", i)).collect();
    assert_eq!(names, expected);

    let filter = Filter::parse(r#"{"status":[1,2]}"#).unwrap();
    let union = dao.read_many(ListQuery::new().page(1, 100).filter(filter), None).await;
    let rows = union.result().unwrap();
    assert_eq!(union.count, Some(rows.len() as u64));
    assert!(rows.iter().all(|u| u.status == 1 || u.status == 2));
    assert_eq!(rows.len(), 17);

    let by_null = dao
        .read_many_without_pagination(SortOrder::Asc, Some("username"), Some(Filter::eq("last_name", FieldValue::Null)), None)
        .await;
    assert_eq!(by_null.into_result().map(|rows| rows.len()), Some(25));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete_counts() {
    let db = TestDatabase::new().await;
    let dao = dao(&db);
    let users = timeline(3);
    let id = users[0].id;
    dao.create_many(users, None).await;

    let updated = dao.update(id, Patch::new().set("last_name", "Lovelace"), None).await;
    assert_eq!(updated.code(), ResultCode::Success);
    assert_eq!(updated.into_result(), Some(1));

    let stored = dao.read(id, None).await.into_result().unwrap();
    assert_eq!(stored.last_name.as_deref(), Some("Lovelace"));
    assert!(stored.updated_at > stored.created_at);

    let missing = dao.update(UserId::new(), Patch::new().set("status", 2), None).await;
    assert_eq!(missing.code(), ResultCode::NotFound);

    assert_eq!(dao.delete(id, None).await.into_result(), Some(1));
    let again = dao.delete(id, None).await;
    assert_eq!(again.code(), ResultCode::NotFound);
    assert_eq!(again.into_result(), Some(0));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_caller_transaction_rollback_discards_writes() {
    let db = TestDatabase::new().await;
    let dao = dao(&db);

    let mut tx = dao.begin().await.unwrap();
    let created = dao.create(create_test_user("ghost", 1), Some(&mut tx)).await;
    let id = created.into_result().unwrap();
    assert_eq!(dao.read(id, Some(&mut tx)).await.code(), ResultCode::Success);
    dao.rollback(tx).await.unwrap();

    assert_eq!(dao.read(id, None).await.code(), ResultCode::NotFound);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_batch_is_rejected_atomically() {
    let db = TestDatabase::new().await;
    let dao = dao(&db);
    let user = create_test_user("dupe", 1);

    let batch = dao.create_many(vec![create_test_user("fresh", 1), user.clone(), user], None).await;
    assert_eq!(batch.code(), ResultCode::DatabaseError);

    let all = dao
        .read_many_without_pagination(SortOrder::Desc, None, None, None)
        .await;
    assert_eq!(all.into_result().map(|rows| rows.len()), Some(0));
}
