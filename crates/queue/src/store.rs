use crate::StoreError;

const MAX_KEY_LEN: usize = 128;

/// Persisted keyed byte storage.
///
/// Every `put` and `delete` is atomic per key: a reader sees either the
/// whole old record or the whole new one. Implementations block, so async
/// callers go through `spawn_blocking`.
pub trait Store: Send + Sync + 'static {
    fn put(&self, key: &str, record: &[u8]) -> Result<(), StoreError>;

    /// The record under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove `key`. Returns false if it was not there.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Total bytes held by all records.
    fn used_bytes(&self) -> Result<u64, StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
