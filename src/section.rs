// Typed configuration sections and their compiled-in defaults
//
// A section type opts into typed access by implementing `ConfigSection`.
// Defaults come from two places, checked in order:
// 1. `ConfigSection::default_section()` on the type itself
// 2. a `DefaultRegistry` populated by the host at startup

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// A persistable configuration section
///
/// # Examples
///
/// ```
/// use mako_config::ConfigSection;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct WifiConfig {
///     ssid: String,
/// }
///
/// impl ConfigSection for WifiConfig {
///     const SECTION_NAME: &'static str = "Wifi";
///
///     fn default_section() -> Option<Self> {
///         Some(WifiConfig { ssid: "mako".to_string() })
///     }
/// }
///
/// assert_eq!(WifiConfig::default_section().unwrap().ssid, "mako");
/// ```
pub trait ConfigSection: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Conventional section name for this type
    const SECTION_NAME: &'static str;

    /// Compiled-in default; `None` means the type has no default
    fn default_section() -> Option<Self> {
        None
    }
}

type DefaultFactory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Startup registry mapping a section type to a default factory
///
/// Consulted when the type's own `default_section()` returns `None`.
#[derive(Clone, Default)]
pub struct DefaultRegistry {
    factories: HashMap<TypeId, DefaultFactory>,
}

impl DefaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the default factory for `T`
    pub fn register<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ConfigSection,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.factories.insert(
            TypeId::of::<T>(),
            Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>),
        );
        self
    }

    pub fn contains<T: ConfigSection>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    /// Produce a fresh default for `T`, if one was registered
    pub fn get<T: ConfigSection>(&self) -> Option<T> {
        let factory = self.factories.get(&TypeId::of::<T>())?;
        factory().downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Resolve the default for `T`: the type's own first, then the registry
pub fn resolve_default<T: ConfigSection>(registry: &DefaultRegistry) -> Option<T> {
    T::default_section().or_else(|| registry.get::<T>())
}
