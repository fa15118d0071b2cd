//! Directory-backed storage with file locking

use super::{Storage, StorageError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Stores each key as `<dir>/<key>.json`
///
/// Writers take an exclusive lock and readers a shared lock, so several
/// processes can point at the same directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(key, e)),
        };

        file.lock_shared().map_err(|_| StorageError::Lock {
            key: key.to_string(),
        })?;
        let mut contents = String::new();
        let read = file.read_to_string(&mut contents);
        let _ = file.unlock();
        read.map_err(|e| StorageError::io(key, e))?;

        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StorageError::io(key, e))?;

        file.lock_exclusive().map_err(|_| StorageError::Lock {
            key: key.to_string(),
        })?;
        let written = file
            .set_len(0)
            .and_then(|_| file.write_all(value.as_bytes()))
            .and_then(|_| file.flush());
        let _ = file.unlock();
        written.map_err(|e| StorageError::io(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_roundtrip() -> Result<(), StorageError> {
        let dir = tempdir().map_err(|e| StorageError::io("tempdir", e))?;
        let storage = FileStorage::new(dir.path().join("state"))?;

        assert_eq!(storage.get("auth_user")?, None);

        storage.set("auth_user", r#"{"id":1}"#)?;
        storage.set("auth_user", r#"{"id":2}"#)?;
        assert_eq!(storage.get("auth_user")?.as_deref(), Some(r#"{"id":2}"#));

        storage.remove("auth_user")?;
        storage.remove("auth_user")?;
        assert_eq!(storage.get("auth_user")?, None);
        Ok(())
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(matches!(
            storage.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }
}
