//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Connection handle shared by all SQLite repositories
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
///
/// The connection slot stays `None` until `init_db` has run, so repositories
/// can be built before the database is ready.
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    path: PathBuf,
}

impl DbState {
    pub fn new(path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared connection handle for repositories
    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

/// Open the database at `db_path` (`:memory:` for a private in-memory db)
/// and run migrations
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        Connection::open(db_path)
    }
    .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(db_err)?;

    run_migrations(&conn)?;
    tracing::debug!(path = %db_path.display(), "database ready");

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);

    Ok(state)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS trips (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            destination TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at INTEGER,
            updated_at INTEGER
        );

        CREATE TABLE IF NOT EXISTS itinerary_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            trip_id INTEGER NOT NULL REFERENCES trips(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date INTEGER NOT NULL,
            position INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_itinerary_items_trip ON itinerary_items(trip_id);

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER
        );",
    )
    .map_err(|e| DomainError::Internal(format!("Migration failed: {}", e)))
}

pub(crate) fn db_err(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Convert a SQLite rowid into an entity ID; ids beyond `u32::MAX` are refused
pub(crate) fn rowid_to_id(rowid: i64) -> DomainResult<u32> {
    u32::try_from(rowid)
        .map_err(|_| DomainError::Internal(format!("id space exhausted: rowid {}", rowid)))
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
