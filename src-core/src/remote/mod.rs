//! Datastore seam
//!
//! Everything the store persists goes through [`Datastore`]: the local
//! SQLite database or the hosted PostgREST tables.

mod rest;

use async_trait::async_trait;

use crate::domain::{DomainResult, Record, Snapshot, Table};

pub use rest::RestDatastore;

/// Table-level persistence used by the store
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Short label used in log lines
    fn name(&self) -> &'static str;

    /// Fetch every table
    async fn load(&self) -> DomainResult<Snapshot>;

    /// Insert or replace one record
    async fn upsert(&self, record: &Record) -> DomainResult<()>;

    /// Delete rows of a table by id
    async fn delete(&self, table: Table, ids: &[String]) -> DomainResult<()>;

    /// Delete every row of `table` whose list is `list_id`
    async fn delete_by_list(&self, table: Table, list_id: &str) -> DomainResult<()>;
}
