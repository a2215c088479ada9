//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, Entity, Trip};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity, returning it with its assigned ID
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Trip data source consumed by the view-state layer
///
/// Update and delete of an unknown ID fail with `DomainError::NotFound`.
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// All trips in repository order (ascending ID), itineraries included
    async fn get_trips(&self) -> DomainResult<Vec<Trip>>;

    /// Store a new trip. The trip ID and unset item IDs are assigned here.
    async fn add_trip(&self, trip: &Trip) -> DomainResult<Trip>;

    /// Replace the stored trip with the same ID, itinerary included
    async fn update_trip(&self, trip: &Trip) -> DomainResult<Trip>;

    /// Remove a trip and its itinerary
    async fn delete_trip(&self, trip_id: u32) -> DomainResult<()>;
}
