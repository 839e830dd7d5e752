// Service layer for dependency injection and testability
//
// Architecture Pattern: Ports and Adapters
// - Traits define the ports (FileSystem, StorageService, ConfigurationProvider)
// - ConfigurationService implements the business logic on top of StorageService
// - Adapters (RealFileSystem, FileStorageService, InMemoryStorage) connect to
//   the actual storage medium
//
// Usage Example:
//     // Production code
//     let fs = Arc::new(RealFileSystem);
//     let storage = Arc::new(FileStorageService::new(fs, PathBuf::from("config")));
//     let config = ConfigurationService::new(storage);
//
//     // Test code
//     let storage = Arc::new(InMemoryStorage::new());
//     let config = ConfigurationService::new(storage);

pub mod configuration;
pub mod filesystem;
pub mod memory;
#[cfg(test)]
pub mod mocks;
pub mod storage;
pub mod traits;

// Re-export commonly used types
pub use configuration::{config_file_name, ConfigurationService};
pub use filesystem::RealFileSystem;
pub use memory::InMemoryStorage;
pub use storage::FileStorageService;
pub use traits::{ConfigurationProvider, FileSystem, StorageService};
