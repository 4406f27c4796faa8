//! Service Resolver
//!
//! Finds a service's factory and instantiates the service.
//!
//! ```text
//! resolve(key, args)
//!        │
//!        ▼
//! registry.get(key) ──── missing ────▶ Error::UnknownService
//!        │
//!        ▼
//! Factory::Value ─────────────────────▶ Error::UncallableFactory
//! Factory::Callable(f)
//!        │
//!        ▼
//! f(args) ─────────── Err(e) ─────────▶ e, unchanged
//!        │
//!        ▼
//! ServiceInstance
//! ```

use std::any::{Any, type_name};
use std::sync::{Arc, LazyLock};

use bureau_domain::error::{Error, Result};
use bureau_domain::value_objects::{ServiceArgs, ServiceInstance, ServiceKey};
use tracing::{debug, warn};

use crate::registry::{Factory, FactoryRegistry};

static SHARED_LOCATOR: LazyLock<Locator> = LazyLock::new(Locator::new);

/// Resolves services against a [`FactoryRegistry`]
///
/// The locator keeps no state besides its registry handle; every call reads
/// the registry's current contents.
#[derive(Debug, Clone)]
pub struct Locator {
    registry: Arc<FactoryRegistry>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    /// Locator bound to the global registry
    pub fn new() -> Self {
        Self::with_registry(Arc::clone(FactoryRegistry::global()))
    }

    /// Locator bound to an explicit registry
    pub fn with_registry(registry: Arc<FactoryRegistry>) -> Self {
        Self { registry }
    }

    /// The process-wide locator, created on first use
    pub fn shared() -> &'static Locator {
        &SHARED_LOCATOR
    }

    pub fn registry(&self) -> &Arc<FactoryRegistry> {
        &self.registry
    }

    /// Find the factory for `key` and invoke it with `args`
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownService`] if no factory is registered for `key`
    /// - [`Error::UncallableFactory`] if the registered value is not a factory
    /// - whatever the factory itself returned, unchanged
    pub fn resolve(&self, key: impl Into<ServiceKey>, args: &ServiceArgs) -> Result<ServiceInstance> {
        let key = key.into();
        let Some(factory) = self.registry.get(key.as_str()) else {
            warn!(service = %key, "No factory registered for service");
            return Err(Error::unknown_service(key));
        };

        match factory {
            Factory::Callable(factory) => {
                debug!(service = %key, args = args.len(), "Resolving service");
                factory(args).map_err(Error::factory)
            }
            Factory::Value(value) => {
                warn!(service = %key, registered = value.type_name(), "Service factory is not callable");
                Err(Error::uncallable_factory(key))
            }
        }
    }

    /// Resolve and downcast to `T`
    pub fn resolve_as<T: Any + Send + Sync>(
        &self,
        key: impl Into<ServiceKey>,
        args: &ServiceArgs,
    ) -> Result<Arc<T>> {
        let key = key.into();
        let instance = self.resolve(&key, args)?;
        downcast_instance(&key, &instance)
    }
}

/// Downcast `instance`, reporting a type mismatch against `key`
pub(crate) fn downcast_instance<T: Any + Send + Sync>(
    key: &ServiceKey,
    instance: &ServiceInstance,
) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .ok_or_else(|| Error::ServiceTypeMismatch {
            key: key.clone(),
            expected: type_name::<T>(),
            actual: instance.type_name(),
        })
}

/// Resolve through the shared locator
pub fn get_service(key: impl Into<ServiceKey>, args: &ServiceArgs) -> Result<ServiceInstance> {
    Locator::shared().resolve(key, args)
}
