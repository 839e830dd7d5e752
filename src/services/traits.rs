// Core trait definitions for service layer dependency injection
//
// All traits are Send + Sync so services can be shared as Arc<dyn Trait>
// across tokio tasks.

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::path::{Path, PathBuf};

/// Filesystem abstraction for file I/O operations
///
/// Usage:
///     let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
///     let content = fs.read_to_string(Path::new("mako-wifi.cfg")).await?;
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read entire file contents as a UTF-8 string
    ///
    /// # Errors
    /// - File not found
    /// - Permission denied
    /// - Invalid UTF-8 encoding
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string content to a file (creates or overwrites)
    async fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a path exists (file or directory)
    ///
    /// Returns false on permission errors (cannot distinguish from non-existence)
    async fn exists(&self, path: &Path) -> bool;

    /// Check if a path exists and is a regular file
    async fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories (like mkdir -p)
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read directory entries, returning paths
    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Remove a single file
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Rename a file, replacing the destination if it exists
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Flat, name-addressed file storage
///
/// The storage collaborator of the configuration service. Names are plain
/// file names with no directory component.
///
/// Usage:
///     let storage: Arc<dyn StorageService> = Arc::new(InMemoryStorage::new());
///     storage.write_to_file("mako-wifi.cfg", "{}").await?;
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Create or overwrite a file
    ///
    /// # Errors
    /// - Write errors (disk full, permissions)
    /// - Invalid file name
    async fn write_to_file(&self, file_name: &str, text: &str) -> Result<()>;

    /// Whether a file with this name exists
    async fn file_exists(&self, file_name: &str) -> bool;

    /// Read a whole file
    ///
    /// # Errors
    /// - File not found (callers check `file_exists` first)
    /// - Read errors
    async fn read_file(&self, file_name: &str) -> Result<String>;

    /// Delete a file
    async fn delete_file(&self, file_name: &str) -> Result<()>;

    /// All file names known to the storage root
    async fn get_file_names(&self) -> Result<Vec<String>>;
}

/// Raw, string-level configuration access
///
/// The object-safe part of the configuration service, for hosts that hold it
/// as `Arc<dyn ConfigurationProvider>`. Typed access lives on
/// `ConfigurationService` itself.
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Stored JSON text of a section, or None if absent or unreadable
    async fn load_config_section(&self, section_name: &str) -> Option<String>;

    /// Persist raw JSON text; true if the write succeeded
    async fn update_config_section_string(&self, section_name: &str, text: &str) -> bool;

    /// Whether a file exists for the section
    async fn section_exists(&self, section_name: &str) -> bool;

    /// Logical names of all stored sections
    async fn get_sections(&self) -> Vec<String>;

    /// Delete every section file; true only if all deletions succeeded
    async fn clear_all(&self) -> bool;
}
