//! Settings Repository
//!
//! Key/value persistence for app-wide preferences.

use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainResult, Language};
use super::db::{db_err, not_initialized, now_millis, SharedConnection};

const LANGUAGE_KEY: &str = "language";

pub struct SettingsRepository {
    conn: SharedConnection,
}

impl SettingsRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(db_err)
    }

    pub async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_millis()],
        )
        .map_err(db_err)?;

        Ok(())
    }

    /// Stored language, `None` when unset or unrecognised
    pub async fn load_language(&self) -> DomainResult<Option<Language>> {
        let Some(code) = self.get(LANGUAGE_KEY).await? else {
            return Ok(None);
        };

        let language = Language::from_code(&code);
        if language.is_none() {
            tracing::warn!(code = %code, "ignoring unknown stored language");
        }
        Ok(language)
    }

    pub async fn save_language(&self, language: Language) -> DomainResult<()> {
        self.set(LANGUAGE_KEY, language.code()).await
    }
}
