use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{DraftStore, StoreError};
use crate::models::ProjectInput;

/// Storage key the in-progress form is saved under.
pub const DRAFT_STORAGE_KEY: &str = "estimator_form_data";

pub const DEFAULT_MAX_DRAFT_AGE_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Draft serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persisted shape of an in-progress form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDraft {
    pub current_step: u8,
    pub project_data: ProjectInput,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// A fresh draft was found.
    Restored(SavedDraft),
    /// Nothing is saved.
    Empty,
    /// The saved draft was too old and has been removed.
    Stale { saved_at: DateTime<Utc> },
    /// The saved value could not be parsed and has been removed.
    Discarded,
}

/// Saves, restores and clears the single draft slot in a [`DraftStore`].
pub struct DraftManager<'a> {
    store: &'a dyn DraftStore,
    max_age: Duration,
}

impl<'a> DraftManager<'a> {
    pub fn new(store: &'a dyn DraftStore) -> Self {
        Self {
            store,
            max_age: Duration::days(DEFAULT_MAX_DRAFT_AGE_DAYS),
        }
    }

    pub fn with_max_age(
        mut self,
        max_age: Duration,
    ) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub async fn save(
        &self,
        draft: &SavedDraft,
    ) -> Result<(), DraftError> {
        let json = serde_json::to_string(draft)?;
        self.store.set_item(DRAFT_STORAGE_KEY, &json).await?;
        debug!(step = draft.current_step, "draft saved");
        Ok(())
    }

    /// Loads the saved draft if it is younger than the maximum age.
    ///
    /// Stale or unreadable drafts are removed from the store. A draft whose
    /// age equals the maximum is stale.
    pub async fn restore(
        &self,
        now: DateTime<Utc>,
    ) -> Result<RestoreOutcome, DraftError> {
        let Some(raw) = self.store.get_item(DRAFT_STORAGE_KEY).await? else {
            return Ok(RestoreOutcome::Empty);
        };

        let draft: SavedDraft = match serde_json::from_str(&raw) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "discarding unreadable draft");
                self.clear().await?;
                return Ok(RestoreOutcome::Discarded);
            }
        };

        if now - draft.saved_at >= self.max_age {
            info!(saved_at = %draft.saved_at, "discarding stale draft");
            self.clear().await?;
            return Ok(RestoreOutcome::Stale {
                saved_at: draft.saved_at,
            });
        }

        Ok(RestoreOutcome::Restored(draft))
    }

    pub async fn clear(&self) -> Result<(), DraftError> {
        self.store.remove_item(DRAFT_STORAGE_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        items: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn with_item(
            key: &str,
            value: &str,
        ) -> Self {
            let store = Self::default();
            store
                .items
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        fn contains(
            &self,
            key: &str,
        ) -> bool {
            self.items.lock().unwrap().contains_key(key)
        }
    }

    #[async_trait]
    impl DraftStore for MemoryStore {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.items.lock().unwrap().get(key).cloned())
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.items
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
            self.items.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    fn draft(saved_at: DateTime<Utc>) -> SavedDraft {
        SavedDraft {
            current_step: 2,
            project_data: ProjectInput {
                project_type: "Deck/Patio".to_string(),
                location: "Kennewick, WA".to_string(),
                size: "400".to_string(),
                ..ProjectInput::default()
            },
            saved_at,
        }
    }

    #[test]
    fn saved_draft_uses_camel_case_keys() {
        let json = serde_json::to_value(draft(at(1))).unwrap();

        assert_eq!(json["currentStep"], 2);
        assert_eq!(json["projectData"]["projectType"], "Deck/Patio");
        assert_eq!(json["savedAt"], "2025-03-01T12:00:00Z");
    }

    #[tokio::test]
    async fn save_then_restore_within_max_age() {
        let store = MemoryStore::default();
        let manager = DraftManager::new(&store);

        manager.save(&draft(at(1))).await.unwrap();
        let outcome = manager.restore(at(5)).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Restored(draft(at(1))));
        assert!(store.contains(DRAFT_STORAGE_KEY));
    }

    #[tokio::test]
    async fn restore_empty_store() {
        let store = MemoryStore::default();

        let outcome = DraftManager::new(&store).restore(at(1)).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Empty);
    }

    #[tokio::test]
    async fn restore_stale_draft_removes_it() {
        let store = MemoryStore::default();
        let manager = DraftManager::new(&store);
        manager.save(&draft(at(1))).await.unwrap();

        let outcome = manager.restore(at(9)).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Stale { saved_at: at(1) });
        assert!(!store.contains(DRAFT_STORAGE_KEY));
    }

    #[tokio::test]
    async fn restore_at_exact_max_age_is_stale() {
        let store = MemoryStore::default();
        let manager = DraftManager::new(&store);
        manager.save(&draft(at(1))).await.unwrap();

        let outcome = manager.restore(at(8)).await.unwrap();

        assert!(matches!(outcome, RestoreOutcome::Stale { .. }));
    }

    #[tokio::test]
    async fn restore_respects_custom_max_age() {
        let store = MemoryStore::default();
        let manager = DraftManager::new(&store).with_max_age(Duration::days(1));
        manager.save(&draft(at(1))).await.unwrap();

        let outcome = manager.restore(at(3)).await.unwrap();

        assert!(matches!(outcome, RestoreOutcome::Stale { .. }));
    }

    #[tokio::test]
    async fn restore_unreadable_draft_is_discarded() {
        let store = MemoryStore::with_item(DRAFT_STORAGE_KEY, "{not json");

        let outcome = DraftManager::new(&store).restore(at(1)).await.unwrap();

        assert_eq!(outcome, RestoreOutcome::Discarded);
        assert!(!store.contains(DRAFT_STORAGE_KEY));
    }

    #[tokio::test]
    async fn restore_tolerates_missing_project_fields() {
        let store = MemoryStore::with_item(
            DRAFT_STORAGE_KEY,
            r#"{"currentStep":1,"projectData":{"projectType":"Other"},"savedAt":"2025-03-01T12:00:00Z"}"#,
        );

        let outcome = DraftManager::new(&store).restore(at(2)).await.unwrap();

        let RestoreOutcome::Restored(draft) = outcome else {
            panic!("expected restored draft, got {outcome:?}");
        };
        assert_eq!(draft.project_data.project_type, "Other");
        assert!(draft.project_data.features.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_draft() {
        let store = MemoryStore::default();
        let manager = DraftManager::new(&store);
        manager.save(&draft(at(1))).await.unwrap();

        manager.clear().await.unwrap();

        assert!(!store.contains(DRAFT_STORAGE_KEY));
    }
}
