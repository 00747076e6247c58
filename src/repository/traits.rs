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
    /// Create a new entity. The store assigns the id.
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity, failing with `NotFound` if it is gone
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID, together with everything it owns
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Extension for repositories that support paged text search
#[async_trait]
pub trait SearchableRepository<T: Entity>: Repository<T> {
    /// Substring search. Returns one page and the total number of matches.
    async fn search_paged(
        &self,
        query: Option<&str>,
        offset: u32,
        limit: u32,
    ) -> DomainResult<(Vec<T>, u32)>;
}
