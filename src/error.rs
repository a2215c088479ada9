//! Application Errors
//!
//! Top-level error type for bootstrapping the app.

use std::path::PathBuf;

use rolling_logger::LoggerError;
use thiserror::Error;
use trip_core::DomainError;

use crate::config::ConfigError;
use crate::store::SyncError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error("Storage error: {0}")]
    Storage(#[from] DomainError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Failed to create data directory '{path}': {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;
