//! Application Context
//!
//! Shared state handed to the screens: the trip list and the settings store,
//! both backed by the same database.

use std::sync::Arc;

use trip_core::{init_db, DbState, SettingsRepository, SqliteTripRepository};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::settings::SettingsStore;
use crate::store::TripListStore;

#[derive(Clone)]
pub struct AppContext {
    pub trips: TripListStore,
    pub settings: SettingsStore,
    db_state: DbState,
}

impl AppContext {
    /// Open the configured database and load both stores
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        if !config.uses_memory_db() {
            let data_dir = config.data_dir();
            std::fs::create_dir_all(&data_dir).map_err(|source| AppError::DataDir {
                path: data_dir.clone(),
                source,
            })?;
        }

        let db_state = init_db(&config.db_path()).await?;

        let trip_repo = SqliteTripRepository::new(db_state.connection());
        let trips = TripListStore::new(Arc::new(trip_repo));
        let settings = SettingsStore::new(
            SettingsRepository::new(db_state.connection()),
            config.default_language,
        );

        trips.load_trips().await?;
        let language = settings.load().await?;
        tracing::info!(
            trips = trips.trips().len(),
            language = %language,
            db = %db_state.path().display(),
            "App context ready"
        );

        Ok(Self {
            trips,
            settings,
            db_state,
        })
    }

    pub fn db_state(&self) -> &DbState {
        &self.db_state
    }
}
