use {
    crate::*,
    std::{
        collections::BTreeMap,
        sync::{Mutex, MutexGuard, PoisonError},
    },
};

/// Store that lives in process memory. Useful where nothing has to survive
/// a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn put(&self, key: &str, record: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.records().insert(key.to_string(), record.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.records().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.records().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.records().keys().cloned().collect())
    }

    fn used_bytes(&self) -> Result<u64, StoreError> {
        Ok(self.records().values().map(|r| r.len() as u64).sum())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.records().contains_key(key))
    }
}
