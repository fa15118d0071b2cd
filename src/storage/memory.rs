//! In-memory storage backend

use super::{Storage, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Map-backed storage with an optional byte quota
///
/// The quota counts key and value bytes of everything stored, which mirrors
/// how browser storage limits behave and lets tests provoke quota failures.
///
/// # Example
///
/// ```
/// use rftip_client::storage::{MemoryStorage, Storage};
///
/// let storage = MemoryStorage::with_quota(16);
/// assert!(storage.set("token", "abc").is_ok());
/// assert!(storage.set("app_logs", "a value that is too long").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Total key and value bytes currently stored
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();

        if let Some(quota) = self.quota {
            let used_elsewhere: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let required = key.len() + value.len();
            let available = quota.saturating_sub(used_elsewhere);
            if required > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    available,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
