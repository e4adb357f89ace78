//! Generic CRUD controller.
//!
//! Mounts create, read, list, update, and delete routes for any entity
//! exposed through a [`Dao`]. The body of every Dao response is the
//! envelope itself; the HTTP status follows its result code.

use crate::{
    extractors::{ApiJson, ApiQuery, ListParams, OneOrMany, ValidatedJson},
    responses::{self, ApiResult},
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use scaffold_core::{Entity, Filter, Patch, ScaffoldError, ScaffoldResult, Selector};
use scaffold_repository::{Dao, EntityStore};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;
use validator::Validate;

/// An entity that can be served over HTTP.
pub trait Resource: Entity + Serialize {
    /// Validated request body for creation.
    type Draft: DeserializeOwned + Validate + Send + 'static;

    /// Builds a new record from a validated draft.
    fn from_draft(draft: Self::Draft) -> Self;

    /// Parses an identifier taken from the request path.
    fn parse_id(raw: &str) -> ScaffoldResult<Self::Id>;
}

/// Rejects filter and sort columns `E` does not persist.
fn ensure_known_fields<E: Entity>(filter: Option<&Filter>, sort_field: Option<&str>) -> ScaffoldResult<()> {
    if let Some(filter) = filter {
        filter.ensure_fields(E::FIELDS)?;
    }
    if let Some(field) = sort_field {
        E::ensure_field(field)?;
    }
    Ok(())
}

/// Creates the CRUD router for `E`.
///
/// ```text
/// POST   /       one draft or an array of drafts
/// GET    /       ?page=&page_size=&order=&sort_field=&filter=
/// GET    /all    ?order=&sort_field=&filter=
/// GET    /:id
/// PATCH  /:id    JSON object of column assignments
/// PUT    /:id    same as PATCH
/// DELETE /:id
/// ```
pub fn crud_router<E, S>(dao: Dao<E, S>) -> Router
where
    E: Resource,
    S: EntityStore<E>,
{
    Router::new()
        .route("/", post(create::<E, S>).get(list::<E, S>))
        .route("/all", get(list_all::<E, S>))
        .route(
            "/:id",
            get(read::<E, S>)
                .patch(update::<E, S>)
                .put(update::<E, S>)
                .delete(delete::<E, S>),
        )
        .with_state(dao)
}

async fn create<E, S>(
    State(dao): State<Dao<E, S>>,
    ValidatedJson(body): ValidatedJson<OneOrMany<E::Draft>>,
) -> ApiResult
where
    E: Resource,
    S: EntityStore<E>,
{
    let envelope = match body {
        OneOrMany::One(draft) => {
            debug!("Create {} request", E::NAME);
            dao.create(E::from_draft(draft), None).await
        }
        OneOrMany::Many(drafts) if drafts.is_empty() => {
            return Err(ScaffoldError::validation("request body must contain at least one record").into());
        }
        OneOrMany::Many(drafts) => {
            debug!("Create {} request: {} records", E::NAME, drafts.len());
            let records = drafts.into_iter().map(E::from_draft).collect();
            dao.create_many(records, None).await
        }
    };

    Ok(responses::envelope(envelope.map(|id| id.to_string())))
}

async fn list<E, S>(State(dao): State<Dao<E, S>>, ApiQuery(params): ApiQuery<ListParams>) -> ApiResult
where
    E: Resource,
    S: EntityStore<E>,
{
    debug!("List {} request", E::NAME);

    let query = params.into_list_query()?;
    ensure_known_fields::<E>(query.filter.as_ref(), query.sort_field.as_deref())?;
    Ok(responses::counted(dao.read_many(query, None).await))
}

async fn list_all<E, S>(State(dao): State<Dao<E, S>>, ApiQuery(params): ApiQuery<ListParams>) -> ApiResult
where
    E: Resource,
    S: EntityStore<E>,
{
    debug!("List all {} request", E::NAME);

    let filter = params.parsed_filter()?;
    ensure_known_fields::<E>(filter.as_ref(), params.sort_field.as_deref())?;
    let order = params.order.unwrap_or_default();
    let envelope = dao
        .read_many_without_pagination(order, params.sort_field.as_deref(), filter, None)
        .await;
    Ok(responses::envelope(envelope))
}

async fn read<E, S>(State(dao): State<Dao<E, S>>, Path(id): Path<String>) -> ApiResult
where
    E: Resource,
    S: EntityStore<E>,
{
    debug!("Get {} request: {}", E::NAME, id);

    let id = E::parse_id(&id)?;
    Ok(responses::envelope(dao.read(Selector::Id(id), None).await))
}

async fn update<E, S>(
    State(dao): State<Dao<E, S>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult
where
    E: Resource,
    S: EntityStore<E>,
{
    debug!("Update {} request: {}", E::NAME, id);

    let id = E::parse_id(&id)?;
    let patch = Patch::from_json(&body)?;
    for field in patch.fields() {
        E::ensure_field(field)?;
    }
    Ok(responses::envelope(dao.update(Selector::Id(id), patch, None).await))
}

async fn delete<E, S>(State(dao): State<Dao<E, S>>, Path(id): Path<String>) -> ApiResult
where
    E: Resource,
    S: EntityStore<E>,
{
    debug!("Delete {} request: {}", E::NAME, id);

    let id = E::parse_id(&id)?;
    Ok(responses::envelope(dao.delete(Selector::Id(id), None).await))
}
