//! Settings Store
//!
//! App-wide language preference. Changes are persisted first and then
//! published to subscribers.

use std::sync::Arc;

use tokio::sync::watch;
use trip_core::{DomainResult, Language, SettingsRepository};

struct SettingsInner {
    repo: SettingsRepository,
    default_language: Language,
    language: watch::Sender<Language>,
}

#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsInner>,
}

impl SettingsStore {
    pub fn new(repo: SettingsRepository, default_language: Language) -> Self {
        let (language, _) = watch::channel(default_language);
        Self {
            inner: Arc::new(SettingsInner {
                repo,
                default_language,
                language,
            }),
        }
    }

    /// Read the stored language, falling back to the default when unset
    pub async fn load(&self) -> DomainResult<Language> {
        let language = self
            .inner
            .repo
            .load_language()
            .await?
            .unwrap_or(self.inner.default_language);

        self.publish(language);
        Ok(language)
    }

    pub fn language(&self) -> Language {
        *self.inner.language.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.inner.language.subscribe()
    }

    pub fn available_languages(&self) -> &'static [Language] {
        &Language::ALL
    }

    pub async fn update_language(&self, language: Language) -> DomainResult<()> {
        self.inner.repo.save_language(language).await?;
        tracing::info!(language = %language, "Language updated");
        self.publish(language);
        Ok(())
    }

    /// Notify subscribers only when the value actually changes
    fn publish(&self, language: Language) {
        self.inner.language.send_if_modified(|current| {
            if *current == language {
                return false;
            }
            *current = language;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use trip_core::init_db;

    async fn setup_store(default_language: Language) -> SettingsStore {
        let db = init_db(Path::new(":memory:")).await.unwrap();
        SettingsStore::new(SettingsRepository::new(db.connection()), default_language)
    }

    #[tokio::test]
    async fn test_defaults_to_configured_language() {
        let store = setup_store(Language::En).await;
        assert_eq!(store.load().await.unwrap(), Language::En);
        assert_eq!(store.language(), Language::En);
        assert_eq!(store.available_languages(), &[Language::Es, Language::En]);
    }

    #[tokio::test]
    async fn test_update_persists_and_notifies() {
        let store = setup_store(Language::Es).await;
        store.load().await.unwrap();
        let mut rx = store.subscribe();

        store.update_language(Language::En).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Language::En);

        // Same value again: persisted, but no notification
        store.update_language(Language::En).await.unwrap();
        assert!(!rx.has_changed().unwrap());

        store.publish(Language::Es);
        assert_eq!(store.load().await.unwrap(), Language::En);
    }
}
