//! MySQL entity store.

use super::{sql, EntityStore, FindQuery};
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use scaffold_core::{Entity, Filter, Patch, ScaffoldResult};
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySql, Transaction};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Stores entities of type `E` in the table named by `E::TABLE`.
pub struct MySqlStore<E> {
    pool: Arc<dyn DatabasePoolInterface>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> MySqlStore<E> {
    /// Creates a new MySQL store.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for MySqlStore<E> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.pool))
    }
}

#[async_trait]
impl<E> EntityStore<E> for MySqlStore<E>
where
    E: Entity + for<'r> FromRow<'r, MySqlRow>,
{
    type Work = Transaction<'static, MySql>;

    async fn begin(&self) -> ScaffoldResult<Self::Work> {
        Ok(self.pool.inner().begin().await?)
    }

    async fn commit(&self, work: Self::Work) -> ScaffoldResult<()> {
        Ok(work.commit().await?)
    }

    async fn rollback(&self, work: Self::Work) -> ScaffoldResult<()> {
        Ok(work.rollback().await?)
    }

    async fn insert(&self, work: &mut Self::Work, records: &[E]) -> ScaffoldResult<u64> {
        let rows: Vec<_> = records.iter().map(Entity::values).collect();
        let mut builder = sql::insert(E::TABLE, E::FIELDS, &rows);
        debug!("Inserting {} row(s) into {}", rows.len(), E::TABLE);

        let result = builder.build().execute(&mut **work).await?;
        Ok(result.rows_affected())
    }

    async fn find_one(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<Option<E>> {
        let mut builder = sql::select_one(E::TABLE, E::FIELDS, filter);
        debug!("{}", builder.sql());

        Ok(builder.build_query_as::<E>().fetch_optional(&mut **work).await?)
    }

    async fn find(&self, work: &mut Self::Work, query: &FindQuery) -> ScaffoldResult<Vec<E>> {
        let mut builder = sql::select(E::TABLE, E::FIELDS, query);
        debug!("{}", builder.sql());

        Ok(builder.build_query_as::<E>().fetch_all(&mut **work).await?)
    }

    async fn count(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<u64> {
        let mut builder = sql::count(E::TABLE, filter);
        debug!("{}", builder.sql());

        let total: i64 = builder.build_query_scalar().fetch_one(&mut **work).await?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn update(&self, work: &mut Self::Work, filter: &Filter, patch: &Patch) -> ScaffoldResult<u64> {
        let mut builder = sql::update(E::TABLE, filter, patch);
        debug!("{}", builder.sql());

        let result = builder.build().execute(&mut **work).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<u64> {
        let mut builder = sql::delete(E::TABLE, filter);
        debug!("{}", builder.sql());

        let result = builder.build().execute(&mut **work).await?;
        Ok(result.rows_affected())
    }
}
