//! Trip List Store
//!
//! Display state for the programmed-trips screen. The list is a cache of the
//! repository: every write is followed by a full reload, and the whole list
//! is swapped in at once so subscribers never see a half-built collection.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use trip_core::{DomainError, Trip, TripRepository};

/// Snapshot of the trip list as published to subscribers
pub type TripList = Arc<Vec<Trip>>;

/// Failure of a store operation
#[derive(Debug, Error)]
pub enum SyncError {
    /// The repository write failed; no reload was attempted
    #[error("Trip write failed: {0}")]
    Write(#[source] DomainError),
    /// The reload failed; the published list is stale
    #[error("Trip reload failed: {0}")]
    Read(#[source] DomainError),
}

impl SyncError {
    pub fn domain_error(&self) -> &DomainError {
        match self {
            SyncError::Write(e) | SyncError::Read(e) => e,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.domain_error().is_not_found()
    }
}

struct StoreInner {
    repo: Arc<dyn TripRepository>,
    trips: watch::Sender<TripList>,
    /// Held for a whole write + reload so overlapping calls cannot interleave
    write_lock: Mutex<()>,
}

/// Observable trip list backed by a `TripRepository`
#[derive(Clone)]
pub struct TripListStore {
    inner: Arc<StoreInner>,
}

impl TripListStore {
    /// Create an empty store; call `load_trips` to fill it
    pub fn new(repo: Arc<dyn TripRepository>) -> Self {
        let (trips, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(StoreInner {
                repo,
                trips,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Current snapshot
    pub fn trips(&self) -> TripList {
        self.inner.trips.borrow().clone()
    }

    /// Receiver notified each time a reload publishes a new list
    pub fn subscribe(&self) -> watch::Receiver<TripList> {
        self.inner.trips.subscribe()
    }

    pub fn find_trip(&self, id: u32) -> Option<Trip> {
        self.inner
            .trips
            .borrow()
            .iter()
            .find(|trip| trip.id == id)
            .cloned()
    }

    /// Re-fetch every trip from the repository
    pub async fn load_trips(&self) -> Result<(), SyncError> {
        let _guard = self.inner.write_lock.lock().await;
        self.reload().await
    }

    /// Store a new trip, then reload. Returns the trip as stored.
    pub async fn add_trip(&self, trip: Trip) -> Result<Trip, SyncError> {
        let _guard = self.inner.write_lock.lock().await;

        let stored = self
            .inner
            .repo
            .add_trip(&trip)
            .await
            .map_err(|e| write_failed("add", e))?;
        tracing::info!(id = stored.id, destination = %stored.destination, "Added new trip");

        self.reload().await?;
        Ok(stored)
    }

    /// Replace a stored trip, then reload
    pub async fn update_trip(&self, trip: Trip) -> Result<Trip, SyncError> {
        let _guard = self.inner.write_lock.lock().await;

        let stored = self
            .inner
            .repo
            .update_trip(&trip)
            .await
            .map_err(|e| write_failed("update", e))?;
        tracing::info!(id = stored.id, destination = %stored.destination, "Updated trip");

        self.reload().await?;
        Ok(stored)
    }

    /// Delete a trip, then reload
    pub async fn delete_trip(&self, trip_id: u32) -> Result<(), SyncError> {
        let _guard = self.inner.write_lock.lock().await;

        self.inner
            .repo
            .delete_trip(trip_id)
            .await
            .map_err(|e| write_failed("delete", e))?;
        tracing::info!(id = trip_id, "Deleted trip");

        self.reload().await
    }

    /// Caller must hold `write_lock`
    async fn reload(&self) -> Result<(), SyncError> {
        let trips = self.inner.repo.get_trips().await.map_err(|e| {
            tracing::warn!(error = %e, "trip reload failed, keeping previous list");
            SyncError::Read(e)
        })?;

        tracing::debug!(count = trips.len(), "Showing all trips");
        self.inner.trips.send_replace(Arc::new(trips));
        Ok(())
    }
}

fn write_failed(op: &str, e: DomainError) -> SyncError {
    tracing::warn!(op, error = %e, "trip write failed");
    SyncError::Write(e)
}
