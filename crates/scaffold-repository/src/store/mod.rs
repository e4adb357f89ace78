//! Storage backends consumed by the [`Dao`](crate::Dao).
//!
//! Every operation takes the unit of work explicitly; the store never
//! begins or commits on its own.

mod memory;
mod mysql;
pub(crate) mod sql;

pub use memory::{MemoryStore, MemoryWork};
pub use mysql::MySqlStore;

use async_trait::async_trait;
use scaffold_core::{Entity, Filter, Patch, ScaffoldResult, SortOrder};

/// Offset/limit pair applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// A resolved multi-row read. Field names are already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort_field: String,
    pub order: SortOrder,
    pub window: Option<Window>,
}

/// Persistence operations for one entity type.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync + 'static {
    /// Unit of work: a database transaction or an in-memory snapshot.
    type Work: Send;

    /// Begins a unit of work.
    async fn begin(&self) -> ScaffoldResult<Self::Work>;

    /// Makes the writes of `work` durable.
    async fn commit(&self, work: Self::Work) -> ScaffoldResult<()>;

    /// Discards the writes of `work`.
    async fn rollback(&self, work: Self::Work) -> ScaffoldResult<()>;

    /// Inserts every record, returning the inserted row count.
    async fn insert(&self, work: &mut Self::Work, records: &[E]) -> ScaffoldResult<u64>;

    /// First row matching `filter`, in storage order.
    async fn find_one(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<Option<E>>;

    /// Sorted, optionally windowed rows matching the query.
    async fn find(&self, work: &mut Self::Work, query: &FindQuery) -> ScaffoldResult<Vec<E>>;

    /// Number of rows matching `filter`.
    async fn count(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<u64>;

    /// Applies `patch` to matching rows, returning the affected count.
    async fn update(&self, work: &mut Self::Work, filter: &Filter, patch: &Patch) -> ScaffoldResult<u64>;

    /// Deletes matching rows, returning the affected count.
    async fn delete(&self, work: &mut Self::Work, filter: &Filter) -> ScaffoldResult<u64>;
}
