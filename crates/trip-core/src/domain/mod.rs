//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod itinerary;
mod language;
mod trip;

pub use entity::{DomainError, DomainResult, Entity};
pub use itinerary::ItineraryItem;
pub use language::Language;
pub use trip::Trip;
