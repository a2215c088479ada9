//! Trip Repository Module
//!
//! SQLite trip storage split into:
//! - trip_repo: Core CRUD operations
//! - trip_itinerary: Itinerary item reads and writes

mod trip_itinerary;
mod trip_repo;

pub use trip_itinerary::ItineraryOperations;
pub use trip_repo::SqliteTripRepository;
