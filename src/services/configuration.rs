// Configuration service: named JSON sections persisted one file per section
//
// Design Decision: Fall back to a compiled-in default
//
// A missing section file and an undecodable one are treated alike: the
// section type's default (or a registered default) is returned. Only when
// no default exists does the caller get `ConfigError::Configuration`.
//
// Storage and codec failures never cross this boundary as raw errors. Reads
// degrade to "absent", writes degrade to `false` and the change notification
// is simply not raised.
//
// All writes run under one per-instance lock; reads take no lock and rely on
// the storage backend for atomicity (FileStorageService writes via rename).

use super::traits::{ConfigurationProvider, StorageService};
use crate::error::{ConfigError, Result};
use crate::events::{ChangeNotifier, ConfigurationUpdated, SubscriptionId};
use crate::section::{resolve_default, ConfigSection, DefaultRegistry};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// File name prefix of every section file
pub const FILE_PREFIX: &str = "mako-";

/// File name suffix of every section file
pub const FILE_SUFFIX: &str = ".cfg";

/// File name backing a section: `mako-<section>.cfg`, lower-cased
///
/// Names that differ only in case map to the same file.
pub fn config_file_name(section_name: &str) -> String {
    format!("{}{}{}", FILE_PREFIX, section_name, FILE_SUFFIX).to_lowercase()
}

/// Whether a storage file name follows the section file convention
pub fn is_config_file(file_name: &str) -> bool {
    section_name_from_file(file_name).is_some()
}

/// Logical section name recovered from a section file name
pub fn section_name_from_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
}

/// Typed and raw access to persisted configuration sections
///
/// Stateless between calls apart from the write lock and the registered
/// listeners; every read goes back to storage.
///
/// Usage:
///     let storage = Arc::new(InMemoryStorage::new());
///     let service = ConfigurationService::new(storage);
///     service.update_config_section("Wifi", &wifi).await;
///     let wifi: WifiConfig = service.get_config_section("Wifi").await?;
pub struct ConfigurationService {
    storage: Arc<dyn StorageService>,
    defaults: DefaultRegistry,
    notifier: ChangeNotifier,
    write_lock: Mutex<()>,
}

impl ConfigurationService {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self {
            storage,
            defaults: DefaultRegistry::new(),
            notifier: ChangeNotifier::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Attach defaults for section types that carry none of their own
    pub fn with_defaults(mut self, defaults: DefaultRegistry) -> Self {
        self.defaults = defaults;
        self
    }

    /// Register a change listener
    ///
    /// Listeners run synchronously on the writing task, in registration
    /// order, while the write lock is held. Keep them short.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ConfigurationUpdated) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.notifier.listener_count()
    }

    /// Load and decode a section, falling back to its default
    ///
    /// # Errors
    /// - `ConfigError::Configuration` if the section is missing or
    ///   undecodable and `T` has no default
    pub async fn get_config_section<T: ConfigSection>(&self, section_name: &str) -> Result<T> {
        let reason = match self.load_config_section(section_name).await {
            Some(text) => match serde_json::from_str::<T>(&text) {
                Ok(section) => return Ok(section),
                Err(e) => {
                    tracing::error!(
                        "Can't deserialize config section {}: {}",
                        section_name,
                        e
                    );
                    format!("stored section is invalid: {}", e)
                }
            },
            None => "section not found".to_string(),
        };

        match resolve_default::<T>(&self.defaults) {
            Some(section) => {
                tracing::info!("Using default value for config section {}", section_name);
                Ok(section)
            }
            None => Err(ConfigError::configuration(section_name, reason)),
        }
    }

    /// Non-failing variant of `get_config_section`
    pub async fn try_get_config_section<T: ConfigSection>(&self, section_name: &str) -> Option<T> {
        match self.get_config_section(section_name).await {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }

    /// Serialize and persist a section, notifying listeners on success
    pub async fn update_config_section<T>(&self, section_name: &str, section: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        let text = match serde_json::to_string(section) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    "Can't serialize config section {} - config not updated: {}",
                    section_name,
                    e
                );
                return false;
            }
        };

        self.save_config_section(section_name, &text).await
    }

    /// Persist raw JSON text without validating it
    pub async fn update_config_section_string(&self, section_name: &str, text: &str) -> bool {
        self.save_config_section(section_name, text).await
    }

    /// Persist raw JSON text only if it decodes as `T`
    ///
    /// Invalid text is logged and nothing is written.
    pub async fn update_config_section_string_as<T>(&self, section_name: &str, text: &str) -> bool
    where
        T: DeserializeOwned,
    {
        if let Err(e) = serde_json::from_str::<T>(text) {
            tracing::error!(
                "Error in config section {} - config not updated: {}",
                section_name,
                e
            );
            return false;
        }

        self.save_config_section(section_name, text).await
    }

    /// Write a section unless a file for it already exists
    ///
    /// With `overwrite` the existing file is replaced. Returns whether a
    /// write happened and succeeded.
    pub async fn write_default<T>(&self, section_name: &str, section: &T, overwrite: bool) -> bool
    where
        T: Serialize + ?Sized,
    {
        let text = match serde_json::to_string(section) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    "Can't serialize default for config section {}: {}",
                    section_name,
                    e
                );
                return false;
            }
        };

        self.write_default_string(section_name, &text, overwrite).await
    }

    /// Raw-text form of `write_default`; the text is not validated
    pub async fn write_default_string(&self, section_name: &str, text: &str, overwrite: bool) -> bool {
        if !overwrite && self.section_exists(section_name).await {
            tracing::trace!("Config section {} exists, default not written.", section_name);
            return false;
        }

        self.save_config_section(section_name, text).await
    }

    /// Write the type's own default under its conventional name
    ///
    /// Returns false if `T` has no default.
    pub async fn write_section_default<T: ConfigSection>(&self, overwrite: bool) -> bool {
        match resolve_default::<T>(&self.defaults) {
            Some(section) => self.write_default(T::SECTION_NAME, &section, overwrite).await,
            None => false,
        }
    }

    /// Whether a file exists for the section
    pub async fn section_exists(&self, section_name: &str) -> bool {
        self.storage
            .file_exists(&config_file_name(section_name))
            .await
    }

    /// Logical names of all stored sections, in storage order
    pub async fn get_sections(&self) -> Vec<String> {
        match self.storage.get_file_names().await {
            Ok(files) => files
                .iter()
                .filter_map(|file| section_name_from_file(file))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                tracing::error!("Error listing config files: {}", e);
                Vec::new()
            }
        }
    }

    /// Raw stored text of a section
    ///
    /// None if the file doesn't exist or can't be read.
    pub async fn load_config_section(&self, section_name: &str) -> Option<String> {
        let file_name = config_file_name(section_name);
        if !self.storage.file_exists(&file_name).await {
            return None;
        }

        match self.storage.read_file(&file_name).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!("Error loading config from file {}: {}", file_name, e);
                None
            }
        }
    }

    /// Delete every section file
    ///
    /// Keeps going past failures; true only if every deletion succeeded.
    pub async fn clear_all(&self) -> bool {
        let files = match self.storage.get_file_names().await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Error listing config files: {}", e);
                return false;
            }
        };

        let mut result = true;
        for file in files.iter().filter(|f| is_config_file(f)) {
            tracing::trace!("Deleting file {}...", file);
            if let Err(e) = self.storage.delete_file(file).await {
                tracing::error!("Error deleting config file {}: {}", file, e);
                result = false;
            }
        }

        result
    }

    async fn save_config_section(&self, section_name: &str, text: &str) -> bool {
        let file_name = config_file_name(section_name);

        let _guard = self.write_lock.lock().await;
        match self.storage.write_to_file(&file_name, text).await {
            Ok(()) => {
                tracing::trace!("Config section {} updated.", section_name);
                self.notifier
                    .notify(&ConfigurationUpdated::new(section_name));
                true
            }
            Err(e) => {
                tracing::error!("Error saving config to file {}: {}", file_name, e);
                false
            }
        }
    }
}

#[async_trait]
impl ConfigurationProvider for ConfigurationService {
    async fn load_config_section(&self, section_name: &str) -> Option<String> {
        ConfigurationService::load_config_section(self, section_name).await
    }

    async fn update_config_section_string(&self, section_name: &str, text: &str) -> bool {
        ConfigurationService::update_config_section_string(self, section_name, text).await
    }

    async fn section_exists(&self, section_name: &str) -> bool {
        ConfigurationService::section_exists(self, section_name).await
    }

    async fn get_sections(&self) -> Vec<String> {
        ConfigurationService::get_sections(self).await
    }

    async fn clear_all(&self) -> bool {
        ConfigurationService::clear_all(self).await
    }
}
