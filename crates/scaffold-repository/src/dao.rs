//! Generic data access object.
//!
//! A [`Dao`] turns CRUD intents into [`EntityStore`] calls and reports
//! every outcome as an [`Envelope`]. Storage errors are logged once and
//! never escape.
//!
//! Every operation accepts an optional caller-owned unit of work. Without
//! one the Dao begins its own, commits it on success and rolls it back on
//! failure. With one the Dao only participates: the caller decides whether
//! to commit.

use crate::store::{EntityStore, FindQuery, Window};
use chrono::Utc;
use scaffold_core::{
    CountedEnvelope, Entity, Envelope, Filter, ListQuery, Logger, Patch, ScaffoldError, ScaffoldResult,
    Selector, SortOrder,
};
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Either a unit of work lent by the caller or one the Dao owns.
enum Scope<'a, W> {
    Borrowed(&'a mut W),
    Owned(W),
}

impl<W> Scope<'_, W> {
    fn work(&mut self) -> &mut W {
        match self {
            Self::Borrowed(work) => &mut **work,
            Self::Owned(work) => work,
        }
    }
}

/// CRUD access to entities of type `E` stored in `S`.
pub struct Dao<E, S> {
    store: Arc<S>,
    logger: Arc<dyn Logger>,
    tag: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Clone for Dao<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            logger: Arc::clone(&self.logger),
            tag: self.tag.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, S> Dao<E, S>
where
    E: Entity,
    S: EntityStore<E>,
{
    /// Creates a Dao logging under the tag `<Entity>Dao`.
    #[must_use]
    pub fn new(store: Arc<S>, logger: Arc<dyn Logger>) -> Self {
        Self {
            store,
            logger,
            tag: format!("{}Dao", E::NAME),
            _entity: PhantomData,
        }
    }

    /// Begins a unit of work the caller can pass to several calls.
    pub async fn begin(&self) -> ScaffoldResult<S::Work> {
        self.store.begin().await
    }

    /// Commits a caller-owned unit of work.
    pub async fn commit(&self, work: S::Work) -> ScaffoldResult<()> {
        self.store.commit(work).await
    }

    /// Rolls back a caller-owned unit of work.
    pub async fn rollback(&self, work: S::Work) -> ScaffoldResult<()> {
        self.store.rollback(work).await
    }

    /// Inserts one record and returns its identifier.
    pub async fn create(&self, record: E, work: Option<&mut S::Work>) -> Envelope<E::Id> {
        let id = record.id();
        let meta = self.meta("create", json!({ "id": id.to_string() }));
        self.logger.debug(&format!("Creating {}", E::NAME), &self.tag, &meta);

        match self.insert(vec![record], work).await {
            Ok(_) => {
                self.logger.info(&format!("{} created", E::NAME), &self.tag, &meta);
                Envelope::created(format!("{} created", E::NAME), id)
            }
            Err(e) => Envelope::database_error(self.failed("create", &e, meta)),
        }
    }

    /// Inserts every record atomically and returns the first identifier.
    pub async fn create_many(&self, records: Vec<E>, work: Option<&mut S::Work>) -> Envelope<E::Id> {
        let ids: Vec<String> = records.iter().map(|r| r.id().to_string()).collect();
        let meta = self.meta("create_many", json!({ "ids": ids }));

        let Some(first) = records.first().map(Entity::id) else {
            let e = ScaffoldError::validation("nothing to insert");
            return Envelope::database_error(self.failed("create_many", &e, meta));
        };

        match self.insert(records, work).await {
            Ok(count) => {
                self.logger
                    .info(&format!("{} {} record(s) created", count, E::NAME), &self.tag, &meta);
                Envelope::created(format!("{} records created", E::NAME), first)
            }
            Err(e) => Envelope::database_error(self.failed("create_many", &e, meta)),
        }
    }

    async fn insert(&self, records: Vec<E>, work: Option<&mut S::Work>) -> ScaffoldResult<u64> {
        let mut scope = self.open(work).await?;
        let outcome = self.store.insert(scope.work(), &records).await;
        self.finish(scope, outcome).await
    }

    /// Returns the first record matching `selector`.
    pub async fn read(
        &self,
        selector: impl Into<Selector<E::Id>> + Send,
        work: Option<&mut S::Work>,
    ) -> Envelope<E> {
        let filter = selector.into().into_filter(E::ID_FIELD);
        let meta = self.meta("read", json!({ "filter": filter }));
        self.logger.debug(&format!("Reading {}", E::NAME), &self.tag, &meta);

        let outcome = async {
            filter.ensure_fields(E::FIELDS)?;
            let mut scope = self.open(work).await?;
            let found = self.store.find_one(scope.work(), &filter).await;
            self.finish(scope, found).await
        }
        .await;

        match outcome {
            Ok(Some(record)) => Envelope::success(format!("{} found", E::NAME), record),
            Ok(None) => {
                self.logger.debug(&format!("{} not found", E::NAME), &self.tag, &meta);
                Envelope::not_found(format!("{} not found", E::NAME))
            }
            Err(e) => Envelope::database_error(self.failed("read", &e, meta)),
        }
    }

    /// Applies `patch` to every record matching `selector`.
    ///
    /// Stamps the entity's update-timestamp column unless the patch sets it.
    pub async fn update(
        &self,
        selector: impl Into<Selector<E::Id>> + Send,
        patch: Patch,
        work: Option<&mut S::Work>,
    ) -> Envelope<u64> {
        let filter = selector.into().into_filter(E::ID_FIELD);
        let fields: Vec<String> = patch.fields().map(str::to_string).collect();
        let meta = self.meta("update", json!({ "filter": filter, "fields": fields }));
        self.logger.debug(&format!("Updating {}", E::NAME), &self.tag, &meta);

        let outcome = async {
            filter.ensure_fields(E::FIELDS)?;
            let patch = Self::prepare_patch(patch)?;
            let mut scope = self.open(work).await?;
            let affected = self.store.update(scope.work(), &filter, &patch).await;
            self.finish(scope, affected).await
        }
        .await;

        match outcome {
            Ok(0) => {
                self.logger.debug(&format!("No {} matched", E::NAME), &self.tag, &meta);
                Envelope::not_found(format!("{} not found", E::NAME))
            }
            Ok(affected) => {
                let meta = with(meta, "affected", json!(affected));
                self.logger.info(&format!("{} updated", E::NAME), &self.tag, &meta);
                Envelope::success(format!("{} updated", E::NAME), affected)
            }
            Err(e) => Envelope::database_error(self.failed("update", &e, meta)),
        }
    }

    fn prepare_patch(patch: Patch) -> ScaffoldResult<Patch> {
        for field in patch.fields() {
            E::ensure_field(field)?;
        }
        if patch.contains(E::ID_FIELD) {
            return Err(ScaffoldError::validation(format!(
                "the identifier column '{}' cannot be updated",
                E::ID_FIELD
            )));
        }

        let patch = match E::UPDATED_FIELD {
            Some(stamp) if !patch.contains(stamp) => patch.set(stamp, Utc::now()),
            _ => patch,
        };
        if patch.is_empty() {
            return Err(ScaffoldError::validation("patch assigns no fields"));
        }
        Ok(patch)
    }

    /// Returns one page of matching records plus the total match count.
    pub async fn read_many(&self, query: ListQuery, work: Option<&mut S::Work>) -> CountedEnvelope<Vec<E>> {
        let filter = query.filter.unwrap_or_else(Filter::all);
        let sort_field = query.sort_field.unwrap_or_else(|| E::CREATED_FIELD.to_string());
        let meta = self.meta(
            "read_many",
            json!({
                "filter": filter,
                "sort_field": sort_field,
                "order": query.order.as_sql(),
                "page": query.page.page,
                "page_size": query.page.page_size,
            }),
        );
        self.logger.debug(&format!("Listing {}", E::NAME), &self.tag, &meta);

        let find = FindQuery {
            filter,
            sort_field,
            order: query.order,
            window: Some(Window {
                offset: query.page.offset(),
                limit: query.page.limit(),
            }),
        };

        let outcome = async {
            Self::ensure_query(&find)?;
            let mut scope = self.open(work).await?;
            let page = async {
                let rows = self.store.find(scope.work(), &find).await?;
                let total = self.store.count(scope.work(), &find.filter).await?;
                Ok::<_, ScaffoldError>((rows, total))
            }
            .await;
            self.finish(scope, page).await
        }
        .await;

        match outcome {
            Ok((rows, total)) => CountedEnvelope::success(format!("{} list retrieved", E::NAME), rows, total),
            Err(e) => CountedEnvelope::database_error(self.failed("read_many", &e, meta)),
        }
    }

    /// Returns every matching record, sorted, without a page window.
    pub async fn read_many_without_pagination(
        &self,
        order: SortOrder,
        sort_field: Option<&str>,
        filter: Option<Filter>,
        work: Option<&mut S::Work>,
    ) -> Envelope<Vec<E>> {
        let find = FindQuery {
            filter: filter.unwrap_or_else(Filter::all),
            sort_field: sort_field.unwrap_or(E::CREATED_FIELD).to_string(),
            order,
            window: None,
        };
        let meta = self.meta(
            "read_many_without_pagination",
            json!({ "filter": find.filter, "sort_field": find.sort_field, "order": order.as_sql() }),
        );
        self.logger.debug(&format!("Listing all {}", E::NAME), &self.tag, &meta);

        let outcome = async {
            Self::ensure_query(&find)?;
            let mut scope = self.open(work).await?;
            let rows = self.store.find(scope.work(), &find).await;
            self.finish(scope, rows).await
        }
        .await;

        match outcome {
            Ok(rows) => Envelope::success(format!("{} list retrieved", E::NAME), rows),
            Err(e) => Envelope::database_error(self.failed("read_many_without_pagination", &e, meta)),
        }
    }

    fn ensure_query(find: &FindQuery) -> ScaffoldResult<()> {
        find.filter.ensure_fields(E::FIELDS)?;
        E::ensure_field(&find.sort_field)
    }

    /// Deletes every record matching `selector`.
    ///
    /// A miss is reported as `NotFound` carrying an affected count of `0`.
    pub async fn delete(
        &self,
        selector: impl Into<Selector<E::Id>> + Send,
        work: Option<&mut S::Work>,
    ) -> Envelope<u64> {
        let filter = selector.into().into_filter(E::ID_FIELD);
        let meta = self.meta("delete", json!({ "filter": filter }));
        self.logger.debug(&format!("Deleting {}", E::NAME), &self.tag, &meta);

        let outcome = async {
            filter.ensure_fields(E::FIELDS)?;
            let mut scope = self.open(work).await?;
            let affected = self.store.delete(scope.work(), &filter).await;
            self.finish(scope, affected).await
        }
        .await;

        match outcome {
            Ok(0) => Envelope::not_found(format!("{} not found", E::NAME)).with_result(0),
            Ok(affected) => {
                let meta = with(meta, "affected", json!(affected));
                self.logger.info(&format!("{} deleted", E::NAME), &self.tag, &meta);
                Envelope::success(format!("{} deleted", E::NAME), affected)
            }
            Err(e) => Envelope::database_error(self.failed("delete", &e, meta)),
        }
    }

    async fn open<'w>(&self, work: Option<&'w mut S::Work>) -> ScaffoldResult<Scope<'w, S::Work>> {
        match work {
            Some(work) => Ok(Scope::Borrowed(work)),
            None => Ok(Scope::Owned(self.store.begin().await?)),
        }
    }

    async fn finish<T>(&self, scope: Scope<'_, S::Work>, outcome: ScaffoldResult<T>) -> ScaffoldResult<T> {
        let Scope::Owned(work) = scope else {
            return outcome;
        };

        match outcome {
            Ok(value) => {
                self.store.commit(work).await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.store.rollback(work).await {
                    self.logger.warn(
                        &format!("Rollback failed: {}", rollback),
                        &self.tag,
                        &self.meta("rollback", Value::Null),
                    );
                }
                Err(e)
            }
        }
    }

    fn meta(&self, operation: &str, details: Value) -> Value {
        json!({ "entity": E::NAME, "operation": operation, "details": details })
    }

    fn failed(&self, operation: &str, error: &ScaffoldError, meta: Value) -> String {
        let meta = with(meta, "error", json!(error.to_string()));
        let message = format!("{} {} failed", E::NAME, operation);
        self.logger.error(&message, &self.tag, &meta);
        message
    }
}

fn with(mut meta: Value, key: &str, value: Value) -> Value {
    if let Value::Object(map) = &mut meta {
        map.insert(key.to_string(), value);
    }
    meta
}
