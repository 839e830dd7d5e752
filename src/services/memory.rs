// In-memory storage backend
//
// Used by hosts without a writable filesystem and throughout the test suite.
// Supports simple fault injection so callers can exercise error paths.

use super::traits::StorageService;
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// BTreeMap-backed flat storage; names are listed in lexicographic order
#[derive(Default)]
pub struct InMemoryStorage {
    files: RwLock<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
    fail_listing: AtomicBool,
    fail_deletes: RwLock<BTreeSet<String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with existing files
    pub fn with_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        {
            let mut guard = storage.files_mut();
            for (name, text) in files {
                guard.insert(name.into(), text.into());
            }
        }
        storage
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `get_file_names` fail
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Make deletion of one specific file fail
    pub fn fail_delete_of(&self, file_name: &str) {
        self.fail_deletes
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(file_name.to_string());
    }

    /// Current content of a file, bypassing the trait
    pub fn contents(&self, file_name: &str) -> Option<String> {
        self.files().get(file_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    fn files(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.files.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn files_mut(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.files.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StorageService for InMemoryStorage {
    async fn write_to_file(&self, file_name: &str, text: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ConfigError::StorageError(format!(
                "Write to {} rejected",
                file_name
            )));
        }
        self.files_mut()
            .insert(file_name.to_string(), text.to_string());
        Ok(())
    }

    async fn file_exists(&self, file_name: &str) -> bool {
        self.files().contains_key(file_name)
    }

    async fn read_file(&self, file_name: &str) -> Result<String> {
        self.files().get(file_name).cloned().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", file_name),
            ))
        })
    }

    async fn delete_file(&self, file_name: &str) -> Result<()> {
        let rejected = self
            .fail_deletes
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(file_name);
        if rejected {
            return Err(ConfigError::StorageError(format!(
                "Delete of {} rejected",
                file_name
            )));
        }

        match self.files_mut().remove(file_name) {
            Some(_) => Ok(()),
            None => Err(ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", file_name),
            ))),
        }
    }

    async fn get_file_names(&self) -> Result<Vec<String>> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(ConfigError::StorageError("Listing rejected".to_string()));
        }
        Ok(self.files().keys().cloned().collect())
    }
}
