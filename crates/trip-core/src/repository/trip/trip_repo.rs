//! Trip Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Trip CRUD operations. A trip and its
//! itinerary are always written in one transaction.

use async_trait::async_trait;
use rusqlite::{params, Row};
use std::collections::HashMap;

use crate::domain::{DomainError, DomainResult, ItineraryItem, Trip};
use super::super::db::{db_err, not_initialized, now_millis, rowid_to_id, SharedConnection};
use super::super::traits::{Repository, TripRepository};
use super::trip_itinerary::{load_all_items, load_items, write_items};

/// SQLite implementation of the trip repository
pub struct SqliteTripRepository {
    pub(super) conn: SharedConnection,
}

impl SqliteTripRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Trip> for SqliteTripRepository {
    async fn create(&self, entity: &Trip) -> DomainResult<Trip> {
        // The incoming ID is ignored, so items are checked as re-parented
        let draft = entity.assign_id(0);
        draft.validate()?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction().map_err(db_err)?;

        let now = now_millis();
        tx.execute(
            "INSERT INTO trips (destination, start_date, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![draft.destination, draft.start_date, draft.end_date, now],
        )
        .map_err(db_err)?;

        let id = rowid_to_id(tx.last_insert_rowid())?;
        let stored = write_items(&tx, draft.assign_id(id))?;

        tx.commit().map_err(db_err)?;
        Ok(stored)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Trip>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, destination, start_date, end_date FROM trips WHERE id = ?1")
            .map_err(db_err)?;
        let mut rows = stmt.query(params![id]).map_err(db_err)?;

        match rows.next().map_err(db_err)? {
            Some(row) => {
                let trip = row_to_trip(row).map_err(db_err)?;
                let items = load_items(conn, trip.id)?;
                Ok(Some(trip.with_items(items)))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<Trip>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn
            .prepare("SELECT id, destination, start_date, end_date FROM trips ORDER BY id ASC")
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut trips = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            trips.push(row_to_trip(row).map_err(db_err)?);
        }

        let mut items_by_trip: HashMap<u32, Vec<ItineraryItem>> = HashMap::new();
        for item in load_all_items(conn)? {
            items_by_trip.entry(item.trip_id).or_default().push(item);
        }

        Ok(trips
            .into_iter()
            .map(|trip| {
                let items = items_by_trip.remove(&trip.id).unwrap_or_default();
                trip.with_items(items)
            })
            .collect())
    }

    async fn update(&self, entity: &Trip) -> DomainResult<Trip> {
        entity.validate()?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction().map_err(db_err)?;

        let changed = tx
            .execute(
                "UPDATE trips SET destination = ?1, start_date = ?2, end_date = ?3, updated_at = ?4 WHERE id = ?5",
                params![
                    entity.destination,
                    entity.start_date,
                    entity.end_date,
                    now_millis(),
                    entity.id
                ],
            )
            .map_err(db_err)?;

        if changed == 0 {
            return Err(DomainError::trip_not_found(entity.id));
        }

        tx.execute(
            "DELETE FROM itinerary_items WHERE trip_id = ?1",
            params![entity.id],
        )
        .map_err(db_err)?;
        let stored = write_items(&tx, entity.clone())?;

        tx.commit().map_err(db_err)?;
        Ok(stored)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction().map_err(db_err)?;

        // Cascade by hand as well, in case foreign keys are off for this connection
        tx.execute("DELETE FROM itinerary_items WHERE trip_id = ?1", params![id])
            .map_err(db_err)?;
        let removed = tx
            .execute("DELETE FROM trips WHERE id = ?1", params![id])
            .map_err(db_err)?;

        if removed == 0 {
            return Err(DomainError::trip_not_found(id));
        }

        tx.commit().map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl TripRepository for SqliteTripRepository {
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

/// Convert a database row to a Trip (itinerary loaded separately)
fn row_to_trip(row: &Row<'_>) -> rusqlite::Result<Trip> {
    Ok(Trip {
        id: row.get(0)?,
        destination: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        itinerary_items: Vec::new(),
    })
}
