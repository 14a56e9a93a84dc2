//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert a new entity, keeping its id
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity, `NotFound` if the id is unknown
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

/// Update the entity, inserting it when the id is unknown
pub async fn upsert<T, R>(repo: &R, entity: &T) -> DomainResult<T>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    match repo.update(entity).await {
        Err(e) if e.is_not_found() => repo.create(entity).await,
        other => other,
    }
}

/// Extension for repositories that support text search
#[async_trait]
pub trait SearchableRepository<T: Entity>: Repository<T> {
    /// Case-insensitive substring search
    async fn search(&self, query: &str) -> DomainResult<Vec<T>>;
}
