//! Trip Core
//!
//! Layered architecture:
//! - domain: Trip / ItineraryItem entities and domain errors
//! - repository: Data access abstractions and implementations

pub mod domain;
pub mod repository;

pub use domain::{DomainError, DomainResult, Entity, ItineraryItem, Language, Trip};
pub use repository::{
    init_db, DbState, InMemoryTripRepository, Repository, SettingsRepository,
    SqliteTripRepository, TripRepository,
};
