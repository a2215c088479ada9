//! Trip Itinerary Operations
//!
//! Reads and writes of the itinerary items owned by a trip.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{DomainError, DomainResult, ItineraryItem, Trip};
use super::super::db::{db_err, not_initialized, rowid_to_id};
use super::trip_repo::SqliteTripRepository;

/// Trait for itinerary-level queries
#[async_trait]
pub trait ItineraryOperations {
    /// Items of one trip, in itinerary order
    async fn list_items(&self, trip_id: u32) -> DomainResult<Vec<ItineraryItem>>;

    /// Find an item by its ID, whichever trip owns it
    async fn find_item(&self, item_id: u32) -> DomainResult<Option<ItineraryItem>>;
}

#[async_trait]
impl ItineraryOperations for SqliteTripRepository {
    async fn list_items(&self, trip_id: u32) -> DomainResult<Vec<ItineraryItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        load_items(conn, trip_id)
    }

    async fn find_item(&self, item_id: u32) -> DomainResult<Option<ItineraryItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            "SELECT id, title, trip_id, description, date FROM itinerary_items WHERE id = ?1",
            params![item_id],
            row_to_item,
        )
        .optional()
        .map_err(db_err)
    }
}

pub(super) fn load_items(conn: &Connection, trip_id: u32) -> DomainResult<Vec<ItineraryItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, trip_id, description, date FROM itinerary_items WHERE trip_id = ?1 ORDER BY position ASC, id ASC",
        )
        .map_err(db_err)?;

    let items = stmt
        .query_map(params![trip_id], row_to_item)
        .map_err(db_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_err)?;
    Ok(items)
}

pub(super) fn load_all_items(conn: &Connection) -> DomainResult<Vec<ItineraryItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, trip_id, description, date FROM itinerary_items ORDER BY trip_id ASC, position ASC, id ASC",
        )
        .map_err(db_err)?;

    let items = stmt
        .query_map([], row_to_item)
        .map_err(db_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_err)?;
    Ok(items)
}

/// Insert the trip's items in order, assigning IDs to unsaved ones.
///
/// The trip's previous items must already be deleted. An explicit item ID
/// that is still taken belongs to another trip (or is repeated) and fails
/// with `Conflict`.
pub(super) fn write_items(conn: &Connection, mut trip: Trip) -> DomainResult<Trip> {
    for (position, item) in trip.itinerary_items.iter_mut().enumerate() {
        let position = position as i32;

        if item.id == 0 {
            conn.execute(
                "INSERT INTO itinerary_items (trip_id, title, description, date, position) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![trip.id, item.title, item.description, item.date, position],
            )
            .map_err(db_err)?;
            item.id = rowid_to_id(conn.last_insert_rowid())?;
            continue;
        }

        let owner: Option<u32> = conn
            .query_row(
                "SELECT trip_id FROM itinerary_items WHERE id = ?1",
                params![item.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;

        if let Some(owner) = owner {
            return Err(DomainError::Conflict(format!(
                "itinerary item {} already belongs to trip {}",
                item.id, owner
            )));
        }

        conn.execute(
            "INSERT INTO itinerary_items (id, trip_id, title, description, date, position) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![item.id, trip.id, item.title, item.description, item.date, position],
        )
        .map_err(db_err)?;
    }

    Ok(trip)
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<ItineraryItem> {
    Ok(ItineraryItem {
        id: row.get(0)?,
        title: row.get(1)?,
        trip_id: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
    })
}
