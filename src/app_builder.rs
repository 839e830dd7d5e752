// AppBuilder pattern for wiring the configuration service into a host
//
// The builder constructs the storage stack, a single ConfigurationService,
// optionally bridges its change notifications onto an EventBus, and runs the
// host's "configure defaults" hook exactly once at startup.
//
// Usage Example:
//     // Production
//     let deps = AppBuilder::new()
//         .with_settings(ServiceSettings::load()?)
//         .with_production_deps()
//         .with_configure_defaults(|defaults| {
//             defaults.add_section::<WifiConfig>();
//             Ok(())
//         })
//         .build()
//         .await?;
//
//     // Testing
//     let deps = AppBuilder::new().with_in_memory_storage().build().await?;

use crate::error::{ConfigError, Result};
use crate::events::EventBus;
use crate::section::{resolve_default, ConfigSection, DefaultRegistry};
use crate::services::{
    ConfigurationService, FileStorageService, FileSystem, InMemoryStorage, RealFileSystem,
    StorageService,
};
use crate::settings::ServiceSettings;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Default section values collected by the startup hook
pub struct SectionDefaults {
    registry: DefaultRegistry,
    entries: Vec<(String, String)>,
}

impl SectionDefaults {
    fn new(registry: DefaultRegistry) -> Self {
        Self {
            registry,
            entries: Vec::new(),
        }
    }

    /// Queue a default value for a section
    ///
    /// # Errors
    /// - The value can't be serialized
    pub fn add<T>(&mut self, section_name: &str, section: &T) -> Result<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let text = serde_json::to_string(section)?;
        self.entries.push((section_name.to_string(), text));
        Ok(self)
    }

    /// Queue the type's own (or registered) default under its section name
    ///
    /// Types without any default are skipped.
    pub fn add_section<T: ConfigSection>(&mut self) -> &mut Self {
        match resolve_default::<T>(&self.registry) {
            Some(section) => match serde_json::to_string(&section) {
                Ok(text) => self.entries.push((T::SECTION_NAME.to_string(), text)),
                Err(e) => tracing::error!(
                    "Can't serialize default for config section {}: {}",
                    T::SECTION_NAME,
                    e
                ),
            },
            None => tracing::warn!("Config section {} has no default", T::SECTION_NAME),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type ConfigureDefaults = Box<dyn FnOnce(&mut SectionDefaults) -> Result<()> + Send>;

/// Builder for the configuration layer's dependencies
pub struct AppBuilder {
    settings: ServiceSettings,

    // Optional overrides (for testing)
    filesystem: Option<Arc<dyn FileSystem>>,
    storage: Option<Arc<dyn StorageService>>,

    defaults: DefaultRegistry,
    event_bus: Option<Arc<EventBus>>,
    configure_defaults: Option<ConfigureDefaults>,
}

impl AppBuilder {
    /// Create a new AppBuilder with default settings
    pub fn new() -> Self {
        Self {
            settings: ServiceSettings::default(),
            filesystem: None,
            storage: None,
            defaults: DefaultRegistry::new(),
            event_bus: None,
            configure_defaults: None,
        }
    }

    pub fn with_settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the directory holding section files
    pub fn with_base_path(mut self, path: PathBuf) -> Self {
        self.settings.config_dir = path;
        self
    }

    /// Override filesystem (for testing)
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.filesystem = Some(fs);
        self
    }

    /// Override storage service (for testing or custom backends)
    pub fn with_storage(mut self, storage: Arc<dyn StorageService>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Defaults for section types that carry none of their own
    pub fn with_default_registry(mut self, defaults: DefaultRegistry) -> Self {
        self.defaults = defaults;
        self
    }

    /// Forward every change notification onto an event bus
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Hook run once by `build` to write section defaults
    ///
    /// Queued defaults only replace existing files when the settings ask for
    /// `overwrite_defaults`.
    pub fn with_configure_defaults<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut SectionDefaults) -> Result<()> + Send + 'static,
    {
        self.configure_defaults = Some(Box::new(hook));
        self
    }

    /// Use production dependencies
    ///
    /// File storage rooted at the configured directory, on the real
    /// filesystem unless one was injected.
    pub fn with_production_deps(mut self) -> Self {
        let filesystem = self
            .filesystem
            .take()
            .unwrap_or_else(|| Arc::new(RealFileSystem) as Arc<dyn FileSystem>);

        self.storage = Some(Arc::new(FileStorageService::new(
            filesystem.clone(),
            self.settings.config_dir.clone(),
        )) as Arc<dyn StorageService>);
        self.filesystem = Some(filesystem);
        self
    }

    /// Use volatile in-memory storage
    pub fn with_in_memory_storage(mut self) -> Self {
        self.storage = Some(Arc::new(InMemoryStorage::new()) as Arc<dyn StorageService>);
        self
    }

    /// Build the configured dependencies and run the defaults hook
    ///
    /// # Errors
    ///
    /// - Storage not configured
    /// - The defaults hook failed
    pub async fn build(self) -> Result<AppDependencies> {
        let storage = self
            .storage
            .ok_or_else(|| ConfigError::BuildError("Storage not configured".to_string()))?;

        let configuration = Arc::new(
            ConfigurationService::new(storage.clone()).with_defaults(self.defaults.clone()),
        );

        if let Some(bus) = &self.event_bus {
            let bus = bus.clone();
            configuration.subscribe(move |event| {
                if bus.publish(event.clone()).is_err() {
                    tracing::debug!(
                        "No event bus receivers for config section {}",
                        event.section_name
                    );
                }
            });
        }

        if let Some(hook) = self.configure_defaults {
            let mut section_defaults = SectionDefaults::new(self.defaults);
            hook(&mut section_defaults)?;

            let overwrite = self.settings.overwrite_defaults;
            for (section_name, text) in section_defaults.entries {
                configuration
                    .write_default_string(&section_name, &text, overwrite)
                    .await;
            }
        }

        Ok(AppDependencies {
            settings: self.settings,
            storage,
            configuration,
            event_bus: self.event_bus,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for the wired configuration layer
pub struct AppDependencies {
    pub settings: ServiceSettings,
    pub storage: Arc<dyn StorageService>,
    pub configuration: Arc<ConfigurationService>,
    pub event_bus: Option<Arc<EventBus>>,
}
