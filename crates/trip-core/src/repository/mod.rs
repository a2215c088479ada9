//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod memory;
mod settings_repo;
mod traits;
mod trip;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbState, SharedConnection};
pub use memory::InMemoryTripRepository;
pub use settings_repo::SettingsRepository;
pub use traits::{Repository, TripRepository};
pub use trip::{ItineraryOperations, SqliteTripRepository};
