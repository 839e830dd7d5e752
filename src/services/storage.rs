// File-based storage service implementation
//
// Design Decision: One flat directory, one file per name
//
// Names are resolved directly under `base_path`; anything that looks like a
// path (separators, `..`) is rejected. Writes go to `<name>.tmp` first and are
// renamed over the target, so a concurrent reader sees either the previous
// content or the new content, never a partial file.

use super::traits::{FileSystem, StorageService};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Suffix of the staging file used for atomic replace
const TEMP_SUFFIX: &str = ".tmp";

/// File-based flat storage
///
/// Thread Safety: Uses Arc<dyn FileSystem> for shared filesystem access.
/// Two writers of the same name race on the final rename; the configuration
/// service serializes its own writes, other writers must coordinate themselves.
///
/// Usage:
///     let fs = Arc::new(RealFileSystem);
///     let storage = FileStorageService::new(fs, PathBuf::from("config"));
///     storage.write_to_file("mako-wifi.cfg", "{}").await?;
pub struct FileStorageService {
    /// Filesystem abstraction for testing
    fs: Arc<dyn FileSystem>,

    /// Directory holding all files
    base_path: PathBuf,
}

impl FileStorageService {
    /// Create a new file storage service
    ///
    /// The base directory is created if it doesn't exist on first write.
    pub fn new(fs: Arc<dyn FileSystem>, base_path: PathBuf) -> Self {
        Self { fs, base_path }
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Resolve a flat file name under the base directory
    fn file_path(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(ConfigError::PathError(format!(
                "Invalid storage file name: '{}'",
                file_name
            )));
        }
        Ok(self.base_path.join(file_name))
    }

    /// Ensure base directory exists
    async fn ensure_base_dir(&self) -> Result<()> {
        if !self.fs.exists(&self.base_path).await {
            self.fs.create_dir_all(&self.base_path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageService for FileStorageService {
    async fn write_to_file(&self, file_name: &str, text: &str) -> Result<()> {
        let path = self.file_path(file_name)?;
        let staging = self.file_path(&format!("{}{}", file_name, TEMP_SUFFIX))?;

        self.ensure_base_dir().await?;
        self.fs.write(&staging, text).await?;

        if let Err(e) = self.fs.rename(&staging, &path).await {
            if let Err(cleanup) = self.fs.remove_file(&staging).await {
                tracing::debug!("Failed to remove staging file {:?}: {}", staging, cleanup);
            }
            return Err(e);
        }
        Ok(())
    }

    async fn file_exists(&self, file_name: &str) -> bool {
        match self.file_path(file_name) {
            Ok(path) => self.fs.is_file(&path).await,
            Err(_) => false,
        }
    }

    async fn read_file(&self, file_name: &str) -> Result<String> {
        let path = self.file_path(file_name)?;
        self.fs.read_to_string(&path).await
    }

    async fn delete_file(&self, file_name: &str) -> Result<()> {
        let path = self.file_path(file_name)?;
        self.fs.remove_file(&path).await
    }

    async fn get_file_names(&self) -> Result<Vec<String>> {
        if !self.fs.exists(&self.base_path).await {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in self.fs.read_dir(&self.base_path).await? {
            if !self.fs.is_file(&entry).await {
                continue;
            }
            if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
