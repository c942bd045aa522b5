use web_sys::{Storage, Window};

use doodlepad_shared::{SnapshotStore, StorageError};

/// Snapshot slot in `window.localStorage`.
pub struct LocalStore {
    storage: Option<Storage>,
    key: String,
}

impl LocalStore {
    pub fn new(window: &Window, key: &str) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::warn!("localStorage is disabled: {err:?}");
                None
            }
        };
        Self {
            storage,
            key: key.to_string(),
        }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))
    }
}

impl SnapshotStore for LocalStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|err| StorageError::Read(format!("{err:?}")))
    }

    fn save(&mut self, data_url: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&self.key, data_url)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }
}
