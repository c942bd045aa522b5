use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read snapshot: {0}")]
    Read(String),
    #[error("failed to write snapshot: {0}")]
    Write(String),
}

/// Durable slot holding the persisted snapshot of the drawing.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, data_url: &str) -> Result<(), StorageError>;
    fn remove(&mut self) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Makes every subsequent `save` fail, like a full quota.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, data_url: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write("quota exceeded".into()));
        }
        self.value = Some(data_url.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), Ok(None));
        store.save("data:image/png;base64,AAAA").unwrap();
        assert_eq!(store.load(), Ok(Some("data:image/png;base64,AAAA".into())));
        assert_eq!(store.writes(), 1);
        store.remove().unwrap();
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn failing_writes_keep_previous_value() {
        let mut store = MemoryStore::with_value("old");
        store.fail_writes(true);
        assert!(matches!(store.save("new"), Err(StorageError::Write(_))));
        assert_eq!(store.value(), Some("old"));
    }
}
