// ABOUTME: Single-record stores for the user profile and design settings
// ABOUTME: Each edit is applied in memory first and then written through to storage

use crate::errors::Result;
use crate::model::{DesignSettings, UserProfile};
use crate::storage::{self, KeyValueStore, PROFILE_KEY, SETTINGS_KEY};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// One persisted record under a fixed key
pub struct RecordStore<T> {
    key: &'static str,
    value: T,
    storage: Arc<dyn KeyValueStore>,
}

pub type ProfileStore = RecordStore<UserProfile>;
pub type SettingsStore = RecordStore<DesignSettings>;

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Load the record, or its default when the entry is missing or corrupt
    pub fn load(storage: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        let value = storage::load_or_default(storage.as_ref(), key);
        Self {
            key,
            value,
            storage,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Owned copy for renderers and exporters
    pub fn snapshot(&self) -> T {
        self.value.clone()
    }

    pub fn replace(&mut self, value: T) -> Result<()> {
        self.value = value;
        self.persist()
    }

    /// Edit the record in place. The edit stays in memory even if the write fails.
    pub fn update<F>(&mut self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        edit(&mut self.value);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        debug!("Persisting '{}'", self.key);
        storage::save(self.storage.as_ref(), self.key, &self.value).map_err(|e| {
            warn!("Keeping in-memory '{}' after failed write: {}", self.key, e);
            e
        })
    }
}

impl ProfileStore {
    pub fn load_profile(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load(storage, PROFILE_KEY)
    }
}

impl SettingsStore {
    pub fn load_settings(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load(storage, SETTINGS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CarouselError;
    use crate::model::SlideLayout;
    use crate::storage::MemoryStore;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(CarouselError::storage(key, "read-only"))
        }
    }

    #[test]
    fn test_profile_update_is_persisted() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut profile = ProfileStore::load_profile(storage.clone());
        profile
            .update(|p| {
                p.name = "Arjun".into();
                p.handle = "@arjun".into();
            })
            .unwrap();

        let reloaded = ProfileStore::load_profile(storage);
        assert_eq!(reloaded.get().name, "Arjun");
        assert_eq!(reloaded.get().handle, "@arjun");
    }

    #[test]
    fn test_settings_replace_is_persisted() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut settings = SettingsStore::load_settings(storage.clone());
        let mut next = settings.snapshot();
        next.slide_layout = SlideLayout::LeftAligned;
        settings.replace(next).unwrap();

        let reloaded = SettingsStore::load_settings(storage);
        assert_eq!(reloaded.get().slide_layout, SlideLayout::LeftAligned);
    }

    #[test]
    fn test_failed_write_keeps_memory_value() {
        let mut settings = SettingsStore::load_settings(Arc::new(ReadOnlyStore));
        let result = settings.update(|s| s.color_palette = 4);
        assert!(matches!(result, Err(CarouselError::Storage { .. })));
        assert_eq!(settings.get().color_palette, 4);
    }
}
