//! File-backed storage: one file per key under a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Storage, StorageError};

/// Stores each record as `<data_dir>/<key>.json`.
///
/// Writes go through a temp file and rename, so a crash mid-write leaves the
/// previous record intact instead of a truncated one.
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        // Keys are fixed, well-known strings; reject anything that could
        // escape the data directory.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = tmp_path(&path);
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).expect("storage");
        assert!(storage.read("cart_items").expect("read").is_none());
    }

    #[test]
    fn test_write_read_delete_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).expect("storage");

        storage.write("cart_items", "[]").expect("write");
        assert_eq!(storage.read("cart_items").expect("read").as_deref(), Some("[]"));

        storage.delete("cart_items").expect("delete");
        assert!(storage.read("cart_items").expect("read").is_none());

        // Deleting again stays a no-op
        storage.delete("cart_items").expect("delete absent");
    }

    #[test]
    fn test_records_survive_reopening_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let storage = FileStorage::new(dir.path()).expect("storage");
            storage.write("auth_token", "opaque").expect("write");
        }
        let reopened = FileStorage::new(dir.path()).expect("reopen");
        assert_eq!(
            reopened.read("auth_token").expect("read").as_deref(),
            Some("opaque")
        );
    }

    #[test]
    fn test_path_traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).expect("storage");
        let err = storage.read("../escape").expect_err("traversal key");
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(matches!(
            storage.write("", "x").expect_err("empty key"),
            StorageError::InvalidKey(_)
        ));
    }
}
