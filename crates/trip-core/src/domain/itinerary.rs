//! Itinerary Item Entity
//!
//! A single planned activity belonging to exactly one trip.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A planned activity inside a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Unique identifier across all items (0 = not yet stored)
    pub id: u32,
    pub title: String,
    /// Owning trip ID
    pub trip_id: u32,
    pub description: String,
    /// Integer-encoded day, opaque to the core
    pub date: i32,
}

impl ItineraryItem {
    pub fn new(id: u32, title: String, trip_id: u32, description: String, date: i32) -> Self {
        Self {
            id,
            title,
            trip_id,
            description,
            date,
        }
    }

    /// Create an unsaved item; the repository assigns the ID and owner
    pub fn draft(title: String, description: String, date: i32) -> Self {
        Self::new(0, title, 0, description, date)
    }
}

impl Entity for ItineraryItem {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
