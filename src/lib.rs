//! Trip Planner
//!
//! App layer on top of `trip-core`:
//! - config: TOML configuration
//! - store: observable trip list with reload-after-write
//! - settings: language preference
//! - context: wiring of the stores to the database

pub mod config;
pub mod context;
pub mod error;
pub mod settings;
pub mod store;

pub use config::{AppConfig, ConfigError, LogConfig};
pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use settings::SettingsStore;
pub use store::{SyncError, TripList, TripListStore};
pub use trip_core::{
    DomainError, DomainResult, InMemoryTripRepository, ItineraryItem, Language, Trip,
    TripRepository,
};

pub const APP_NAME: &str = "TripPlanner";

/// Start the app: logging first, then database and stores
pub async fn run(config: AppConfig) -> AppResult<AppContext> {
    config.validate()?;
    rolling_logger::init_logger(config.log_dir(), APP_NAME, &config.log_options())?;

    match AppContext::open(&config).await {
        Ok(context) => {
            let _ = rolling_logger::info("App startup complete");
            Ok(context)
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("App startup failed: {}", e));
            Err(e)
        }
    }
}
