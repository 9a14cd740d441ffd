use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::StorageError;
use crate::feed::{ChangeFeed, ChangeReceiver};
use crate::interfaces::StorageBackend;

/// Durable backend storing one file per key under a root directory.
///
/// Change notifications reach the other contexts opened from the same
/// instance with [`DirectoryBackend::context`]; writes made by other
/// processes are not observed.
pub struct DirectoryBackend {
    root: PathBuf,
    feed: ChangeFeed,
}

impl DirectoryBackend {
    /// Open the backend, creating `root` if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Opened directory backend");
        Ok(Self {
            root,
            feed: ChangeFeed::new(),
        })
    }

    /// Open another execution context over the same directory.
    pub fn context(&self) -> Self {
        Self {
            root: self.root.clone(),
            feed: self.feed.context(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && !key.contains("..")
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StorageError::invalid_key(key));
        }
        Ok(self.root.join(key))
    }

    fn read(path: &Path) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace `path` by renaming a fully written sibling file over it, so a
    /// concurrent reader sees either the old document or the new one.
    fn write_atomic(&self, path: &Path, value: &str) -> Result<(), StorageError> {
        let mut file = NamedTempFile::new_in(&self.root)?;
        file.write_all(value.as_bytes())?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StorageBackend for DirectoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::read(&self.path_for(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let old_value = Self::read(&path)?;
        self.write_atomic(&path, value)?;
        if old_value.as_deref() != Some(value) {
            self.feed.publish(key, old_value, Some(value.to_string()));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let old_value = Self::read(&path)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }
        if old_value.is_some() {
            self.feed.publish(key, old_value, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> ChangeReceiver {
        self.feed.subscribe()
    }
}
