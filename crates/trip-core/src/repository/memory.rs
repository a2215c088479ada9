//! In-Memory Trip Repository
//!
//! Vec-backed implementation used by tests and by hosts that do not need
//! persistence. Trips keep insertion order.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::domain::{DomainError, DomainResult, Trip};
use super::traits::{Repository, TripRepository};

#[derive(Default)]
struct MemoryState {
    trips: Vec<Trip>,
    last_trip_id: u32,
    last_item_id: u32,
}

impl MemoryState {
    /// Assign IDs to unsaved items and reject IDs owned elsewhere
    fn assign_item_ids(&mut self, mut trip: Trip) -> DomainResult<Trip> {
        let taken: HashSet<u32> = self
            .trips
            .iter()
            .filter(|stored| stored.id != trip.id)
            .flat_map(|stored| stored.itinerary_items.iter().map(|item| item.id))
            .collect();

        let mut seen = HashSet::new();
        for item in trip.itinerary_items.iter().filter(|item| item.id != 0) {
            if taken.contains(&item.id) || !seen.insert(item.id) {
                return Err(DomainError::Conflict(format!(
                    "itinerary item {} already exists",
                    item.id
                )));
            }
        }

        // Counter is committed only once every item has an ID
        let mut last_item_id = self.last_item_id.max(seen.into_iter().max().unwrap_or(0));
        for item in trip.itinerary_items.iter_mut().filter(|item| item.id == 0) {
            last_item_id = next_id(last_item_id, "itinerary item")?;
            item.id = last_item_id;
        }

        self.last_item_id = last_item_id;
        Ok(trip)
    }
}

fn next_id(last: u32, kind: &str) -> DomainResult<u32> {
    last.checked_add(1)
        .ok_or_else(|| DomainError::Internal(format!("{} id space exhausted", kind)))
}

/// Trip repository kept entirely in memory
#[derive(Default)]
pub struct InMemoryTripRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with already-stored trips, kept as given
    pub fn with_trips(trips: Vec<Trip>) -> Self {
        let last_trip_id = trips.iter().map(|trip| trip.id).max().unwrap_or(0);
        let last_item_id = trips
            .iter()
            .flat_map(|trip| trip.itinerary_items.iter().map(|item| item.id))
            .max()
            .unwrap_or(0);

        Self {
            state: RwLock::new(MemoryState {
                trips,
                last_trip_id,
                last_item_id,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.trips.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Repository<Trip> for InMemoryTripRepository {
    async fn create(&self, entity: &Trip) -> DomainResult<Trip> {
        // The incoming ID is ignored, so items are checked as re-parented
        entity.assign_id(0).validate()?;

        let mut state = self.state.write().await;
        let id = next_id(state.last_trip_id, "trip")?;
        let stored = state.assign_item_ids(entity.assign_id(id))?;

        state.last_trip_id = id;
        state.trips.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Trip>> {
        let state = self.state.read().await;
        Ok(state.trips.iter().find(|trip| trip.id == id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Trip>> {
        Ok(self.state.read().await.trips.clone())
    }

    async fn update(&self, entity: &Trip) -> DomainResult<Trip> {
        entity.validate()?;

        let mut state = self.state.write().await;
        let index = state
            .trips
            .iter()
            .position(|trip| trip.id == entity.id)
            .ok_or_else(|| DomainError::trip_not_found(entity.id))?;

        let stored = state.assign_item_ids(entity.clone())?;
        state.trips[index] = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let before = state.trips.len();
        state.trips.retain(|trip| trip.id != id);

        if state.trips.len() == before {
            return Err(DomainError::trip_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn get_trips(&self) -> DomainResult<Vec<Trip>> {
        self.list().await
    }

    async fn add_trip(&self, trip: &Trip) -> DomainResult<Trip> {
        self.create(trip).await
    }

    async fn update_trip(&self, trip: &Trip) -> DomainResult<Trip> {
        self.update(trip).await
    }

    async fn delete_trip(&self, trip_id: u32) -> DomainResult<()> {
        self.delete(trip_id).await
    }
}
