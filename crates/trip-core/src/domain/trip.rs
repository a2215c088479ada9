//! Trip Entity
//!
//! Aggregate root: a planned journey with a date range and its itinerary.

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};
use super::itinerary::ItineraryItem;

/// A planned trip
///
/// Immutable by convention: edits are made by building a replacement value
/// and handing it to the repository's update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier (0 = new, assigned by the repository)
    #[serde(default)]
    pub id: u32,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    /// Itinerary in insertion order
    #[serde(default)]
    pub itinerary_items: Vec<ItineraryItem>,
}

impl Trip {
    /// Create a new, unsaved trip with an empty itinerary
    pub fn new(destination: String, start_date: String, end_date: String) -> Self {
        Self {
            id: 0,
            destination,
            start_date,
            end_date,
            itinerary_items: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_items(mut self, items: Vec<ItineraryItem>) -> Self {
        self.itinerary_items = items;
        self
    }

    /// Copy with a new ID; every itinerary item is re-parented to it
    pub fn assign_id(&self, id: u32) -> Self {
        let mut trip = self.clone();
        trip.id = id;
        for item in &mut trip.itinerary_items {
            item.trip_id = id;
        }
        trip
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// Check destination and item ownership
    pub fn validate(&self) -> DomainResult<()> {
        if self.destination.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "destination must not be empty".to_string(),
            ));
        }

        if let Some(item) = self
            .itinerary_items
            .iter()
            .find(|item| item.trip_id != self.id)
        {
            return Err(DomainError::InvalidInput(format!(
                "itinerary item {} belongs to trip {}, not {}",
                item.id, item.trip_id, self.id
            )));
        }

        Ok(())
    }
}

impl Entity for Trip {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
