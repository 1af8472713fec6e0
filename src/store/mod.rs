//! Document-store seam.
//!
//! A store exposes per-table insert/update/delete/select/count over schemaless rows.
//! `MemoryStore` backs tests and local runs; `RestStore` talks to a PostgREST-style API.

mod memory;
mod rest;

pub use memory::{IdStrategy, MemoryStore};
pub use rest::RestStore;

use crate::core::{Row, StoreError, StoreResult};
use crate::parser::Predicate;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Insert one row and return the stored row(s), ids included.
    async fn insert(&self, table: &str, values: &Row) -> StoreResult<Vec<Row>>;

    /// Apply `values` to every row matching `filter`; returns the updated rows.
    async fn update(&self, table: &str, values: &Row, filter: &Predicate) -> StoreResult<Vec<Row>>;

    /// Remove every row matching `filter`; returns the removed rows.
    async fn delete(&self, table: &str, filter: &Predicate) -> StoreResult<Vec<Row>>;

    async fn select(
        &self,
        table: &str,
        filter: Option<&Predicate>,
        limit: Option<u64>,
    ) -> StoreResult<Vec<Row>>;

    /// Exactly one row. An empty match is `StoreError::NotFound`.
    async fn select_single(&self, table: &str, filter: Option<&Predicate>) -> StoreResult<Row> {
        self.select(table, filter, Some(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
            })
    }

    async fn count(&self, table: &str, filter: Option<&Predicate>) -> StoreResult<u64>;
}
