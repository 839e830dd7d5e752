// Library interface for mako-config
// Named configuration sections persisted as one JSON file each, with
// compiled-in defaults and change notification.

pub mod app_builder;
pub mod error;
pub mod events;
pub mod section;
pub mod services;
pub mod settings;
pub mod version;

// Re-export commonly used types for convenience
pub use app_builder::{AppBuilder, AppDependencies, SectionDefaults};
pub use error::{ConfigError, Result};
pub use events::{ChangeNotifier, ConfigurationUpdated, EventBus, SubscriptionId};
pub use section::{ConfigSection, DefaultRegistry};
pub use services::{
    config_file_name, ConfigurationProvider, ConfigurationService, FileStorageService, FileSystem,
    InMemoryStorage, RealFileSystem, StorageService,
};
pub use settings::ServiceSettings;
