//! Key-value persistence used for log history and session snapshots

pub mod memory;

#[cfg(feature = "file")]
pub mod file;

pub use memory::MemoryStorage;

#[cfg(feature = "file")]
pub use file::FileStorage;

/// Errors raised by a persistence backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Writing the value would exceed the backend's byte quota
    #[error("Storage quota exceeded for '{key}': need {required} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        required: usize,
        available: usize,
    },

    #[error("Storage IO error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to acquire storage lock for '{key}'")]
    Lock { key: String },

    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

impl StorageError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            key: key.into(),
            source,
        }
    }
}

/// String key-value store, the persistence layer the client writes through
///
/// Implementations must be safe to share between tasks. A missing key is
/// `Ok(None)`, never an error, and removing a missing key succeeds.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn name(&self) -> &str;
}
