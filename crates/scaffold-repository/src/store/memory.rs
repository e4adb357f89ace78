//! In-process entity store.
//!
//! A unit of work is a private copy of the rows, written back on commit.
//! Concurrent units of work do not see each other and the last commit wins.

use super::{EntityStore, FindQuery};
use async_trait::async_trait;
use scaffold_core::{Entity, FieldValue, Filter, Patch, ScaffoldError, ScaffoldResult, SortOrder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Snapshot of the rows taken at `begin`.
#[derive(Debug, Clone)]
pub struct MemoryWork<E> {
    rows: Vec<E>,
}

impl<E> MemoryWork<E> {
    /// Rows visible to this unit of work.
    #[must_use]
    pub fn rows(&self) -> &[E] {
        &self.rows
    }
}

/// Vec-backed store with a switch for simulating an outage.
#[derive(Debug)]
pub struct MemoryStore<E> {
    rows: Arc<Mutex<Vec<E>>>,
    offline: Arc<AtomicBool>,
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            offline: Arc::clone(&self.offline),
        }
    }
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `rows`.
    #[must_use]
    pub fn with_rows(rows: Vec<E>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every subsequent call fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Committed rows.
    pub fn snapshot(&self) -> ScaffoldResult<Vec<E>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> ScaffoldResult<MutexGuard<'_, Vec<E>>> {
        self.rows
            .lock()
            .map_err(|_| ScaffoldError::internal("memory store lock poisoned"))
    }

    fn ensure_online(&self) -> ScaffoldResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ScaffoldError::database("connection refused: store is offline"))
        } else {
            Ok(())
        }
    }
}

fn lookup<E: Entity>(row: &E) -> impl Fn(&str) -> Option<FieldValue> + '_ {
    move |field: &str| row.get(field)
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    type Work = MemoryWork<E>;

    async fn begin(&self) -> ScaffoldResult<Self::Work> {
        self.ensure_online()?;
        Ok(MemoryWork {
            rows: self.lock()?.clone(),
        })
    }

    async fn commit(&self, work: Self::Work) -> ScaffoldResult<()> {
        self.ensure_online()?;
        *self.lock()? = work.rows;
        Ok(())
    }

    async fn rollback(&self, work: Self::Work) -> ScaffoldResult<()> {
        drop(work);
        Ok(())
    }

    async fn insert(&self, work: &mut Self::Work, records: &[E]) -> ScaffoldResult<u64> {
        self.ensure_online()?;
        let mut rows = work.rows.clone();
        for record in records {
            let id = record.id().into();
            let duplicate = rows
                .iter()
                .any(|row| row.get(E::ID_FIELD).is_some_and(|existing| existing.matches(&id)));
            if duplicate {
                return Err(ScaffoldError::database(format!(
                    "Duplicate entry '{}' for key '{}.PRIMARY'",
                    record.id(),
                    E::TABLE
                )));
            }
            rows.push(record.clone());
        }
        work.rows = rows;
        Ok(records.len() as u64)
    }

    async fn find_one(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<Option<E>> {
        self.ensure_online()?;
        Ok(work.rows.iter().find(|row| filter.matches(&lookup(*row))).cloned())
    }

    async fn find(&self, work: &mut Self::Work, query: &FindQuery) -> ScaffoldResult<Vec<E>> {
        self.ensure_online()?;
        let mut rows: Vec<E> = work
            .rows
            .iter()
            .filter(|row| query.filter.matches(&lookup(*row)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let left = a.get(&query.sort_field).unwrap_or(FieldValue::Null);
            let right = b.get(&query.sort_field).unwrap_or(FieldValue::Null);
            match query.order {
                SortOrder::Asc => left.sort_cmp(&right),
                SortOrder::Desc => right.sort_cmp(&left),
            }
        });

        Ok(match query.window {
            Some(window) => rows
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .collect(),
            None => rows,
        })
    }

    async fn count(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<u64> {
        self.ensure_online()?;
        Ok(work.rows.iter().filter(|row| filter.matches(&lookup(*row))).count() as u64)
    }

    async fn update(&self, work: &mut Self::Work, filter: &Filter, patch: &Patch) -> ScaffoldResult<u64> {
        self.ensure_online()?;
        let mut rows = work.rows.clone();
        let mut affected = 0;
        for row in &mut rows {
            if !filter.matches(&lookup(&*row)) {
                continue;
            }
            for (field, value) in patch.iter() {
                row.set(field, value.clone())?;
            }
            affected += 1;
        }
        work.rows = rows;
        Ok(affected)
    }

    async fn delete(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<u64> {
        self.ensure_online()?;
        let before = work.rows.len();
        work.rows.retain(|row| !filter.matches(&lookup(row)));
        Ok((before - work.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Window;
    use scaffold_core::{User, UserDraft};

    fn user(name: &str, status: i32) -> User {
        User::from(UserDraft {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            first_name: None,
            last_name: None,
            status: Some(status),
        })
    }

    #[tokio::test]
    async fn test_commit_publishes_and_rollback_discards() {
        let store = MemoryStore::<User>::new();

        let mut work = store.begin().await.unwrap();
        store.insert(&mut work, &[user("ada", 1)]).await.unwrap();
        assert!(store.snapshot().unwrap().is_empty());
        store.commit(work).await.unwrap();
        assert_eq!(store.snapshot().unwrap().len(), 1);

        let mut work = store.begin().await.unwrap();
        store.delete(&mut work, &Filter::all()).await.unwrap();
        assert!(work.rows().is_empty());
        store.rollback(work).await.unwrap();
        assert_eq!(store.snapshot().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let existing = user("ada", 1);
        let store = MemoryStore::with_rows(vec![existing.clone()]);
        let mut work = store.begin().await.unwrap();
        assert!(store.insert(&mut work, &[existing]).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_work_untouched() {
        let existing = user("ada", 1);
        let store = MemoryStore::with_rows(vec![existing.clone()]);
        let mut work = store.begin().await.unwrap();

        assert!(store.insert(&mut work, &[user("bob", 1), existing]).await.is_err());
        assert_eq!(work.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_work_untouched() {
        let store = MemoryStore::with_rows(vec![user("ada", 1)]);
        let mut work = store.begin().await.unwrap();

        let patch = Patch::new().set("status", 7).set("username", FieldValue::Null);
        assert!(store.update(&mut work, &Filter::all(), &patch).await.is_err());
        assert_eq!(work.rows()[0].status, 1);
        assert_eq!(work.rows()[0].username, "ada");
    }

    #[tokio::test]
    async fn test_find_sorts_and_windows() {
        let store = MemoryStore::with_rows(vec![user("b", 1), user("c", 2), user("a", 1)]);
        let mut work = store.begin().await.unwrap();

        let query = FindQuery {
            filter: Filter::all(),
            sort_field: "username".to_string(),
            order: SortOrder::Asc,
            window: Some(Window { offset: 1, limit: 5 }),
        };
        let rows = store.find(&mut work, &query).await.unwrap();
        let names: Vec<_> = rows.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);

        let total = store.count(&mut work, &Filter::eq("status", 1)).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = MemoryStore::with_rows(vec![user("ada", 1), user("bob", 2)]);
        let mut work = store.begin().await.unwrap();

        let patch = Patch::new().set("status", 3);
        let affected = store.update(&mut work, &Filter::eq("status", 1), &patch).await.unwrap();
        assert_eq!(affected, 1);
        assert_eq!(store.count(&mut work, &Filter::eq("status", 3)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = MemoryStore::<User>::new();
        store.set_offline(true);
        assert!(store.begin().await.is_err());

        store.set_offline(false);
        let mut work = store.begin().await.unwrap();
        store.set_offline(true);
        assert!(store.count(&mut work, &Filter::all()).await.is_err());
    }
}
