//! Factory Registry
//!
//! Stores the factory for every configured service.
//!
//! ## Lifecycle
//!
//! ```text
//! FactoryRegistry::global()   created empty on first use
//!          │
//!          ▼
//! configure(|cfg| ...)         each registration lands as it is made
//!          │
//!          ▼
//! clear()                      back to empty, lookups fail until reconfigured
//! ```
//!
//! ## Usage
//!
//! ```
//! use bureau_application::registry::{Factory, FactoryRegistry, RegistrationCall};
//!
//! let registry = FactoryRegistry::new();
//! registry
//!     .configure(|cfg| {
//!         cfg.register("clock", Factory::from_fn(|_| 1_700_000_000_u64));
//!         cfg.call(
//!             "greeter",
//!             RegistrationCall::new().arg(Factory::from_fn(|args| {
//!                 format!("hi {}", args.arg::<&str>(0).copied().unwrap_or("stranger"))
//!             })),
//!         )?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! ```
//!
//! The map is a [`DashMap`], so the registry may be shared across threads.
//! A `configure` block writes straight into it: a failing registration stops
//! the block, and whatever the block registered before it stays registered.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use bureau_domain::constants::REGISTRATION_ARITY;
use bureau_domain::error::{Error, FactoryError, Result};
use bureau_domain::value_objects::{ServiceArgs, ServiceInstance, ServiceKey};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Signature of an invocable factory
pub type FactoryFn =
    dyn Fn(&ServiceArgs) -> std::result::Result<ServiceInstance, FactoryError> + Send + Sync;

/// Value registered for a service
///
/// Registering a plain [`Factory::Value`] is accepted; resolving it fails
/// with [`Error::UncallableFactory`].
#[derive(Clone)]
pub enum Factory {
    /// Invoked with the call arguments to produce an instance
    Callable(Arc<FactoryFn>),
    /// A value that cannot be invoked
    Value(ServiceInstance),
}

impl Factory {
    /// Wrap a raw factory closure
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&ServiceArgs) -> std::result::Result<ServiceInstance, FactoryError>
            + Send
            + Sync
            + 'static,
    {
        Self::Callable(Arc::new(factory))
    }

    /// Factory that cannot fail
    pub fn from_fn<F, T>(factory: F) -> Self
    where
        F: Fn(&ServiceArgs) -> T + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::new(move |args| Ok(ServiceInstance::new(factory(args))))
    }

    /// Factory whose own errors are handed back to the caller unchanged
    pub fn try_from_fn<F, T, E>(factory: F) -> Self
    where
        F: Fn(&ServiceArgs) -> std::result::Result<T, E> + Send + Sync + 'static,
        T: Any + Send + Sync,
        E: Into<FactoryError>,
    {
        Self::new(move |args| factory(args).map(ServiceInstance::new).map_err(Into::into))
    }

    /// Factory returning the same shared instance on every call
    pub fn constant<T: Any + Send + Sync>(value: T) -> Self {
        Self::shared(ServiceInstance::new(value))
    }

    /// Factory returning `instance` on every call
    pub fn shared(instance: ServiceInstance) -> Self {
        Self::new(move |_| Ok(instance.clone()))
    }

    /// A plain, non-invocable value
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(ServiceInstance::new(value))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Factory::Callable(..)"),
            Self::Value(value) => write!(f, "Factory::Value({})", value.type_name()),
        }
    }
}

/// Registry behaviour toggles, loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    /// Log at warn level when a key is registered again
    pub warn_on_overwrite: bool,
}

/// A registration request made through the dynamic builder surface
///
/// Mirrors a call of the form `identifier(value)`: the positional values and
/// an optional attached callback are recorded, and the shape is checked when
/// the call is dispatched.
#[derive(Debug, Clone, Default)]
pub struct RegistrationCall {
    positional: Vec<Factory>,
    callback: Option<Factory>,
}

impl RegistrationCall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a positional value
    #[must_use]
    pub fn arg(mut self, value: Factory) -> Self {
        self.positional.push(value);
        self
    }

    /// Attach a callback
    #[must_use]
    pub fn with_callback(mut self, callback: Factory) -> Self {
        self.callback = Some(callback);
        self
    }

    fn into_factory(mut self, key: &ServiceKey) -> Result<Factory> {
        if self.callback.is_some() {
            return Err(Error::configuration(format!(
                "cannot register '{key}': registrations take no callback argument"
            )));
        }
        if self.positional.len() != REGISTRATION_ARITY {
            return Err(Error::configuration(format!(
                "cannot register '{key}': expected exactly {REGISTRATION_ARITY} value, got {}",
                self.positional.len()
            )));
        }
        self.positional
            .pop()
            .ok_or_else(|| Error::internal("registration arity checked but no value present"))
    }
}

/// The registry, as handed to a [`FactoryRegistry::configure`] block
///
/// Registrations are visible to lookups on the same registry as soon as the
/// call returns, including lookups made later in the same block.
#[derive(Debug)]
pub struct RegistryBuilder<'a> {
    registry: &'a FactoryRegistry,
    registered: Vec<ServiceKey>,
}

impl RegistryBuilder<'_> {
    /// Register `factory` under `key`
    pub fn register(&mut self, key: impl Into<ServiceKey>, factory: Factory) -> &mut Self {
        let key = key.into();
        self.registry.insert(key.clone(), factory);
        self.registered.push(key);
        self
    }

    /// Dispatch a dynamic `identifier(value)` registration
    ///
    /// Fails with [`Error::Configuration`] when the identifier is not a valid
    /// accessor name, is reserved by the registry, or the call does not carry
    /// exactly one value and no callback.
    pub fn call(&mut self, identifier: &str, call: RegistrationCall) -> Result<&mut Self> {
        let key = ServiceKey::new(identifier);
        if !key.is_identifier() {
            return Err(Error::configuration(format!(
                "cannot register '{key}': not a valid service identifier"
            )));
        }
        if key.is_reserved() {
            return Err(Error::configuration(format!(
                "cannot register '{key}': the name is reserved by the registry"
            )));
        }
        let factory = call.into_factory(&key)?;
        Ok(self.register(key, factory))
    }

    /// Keys registered so far in this block
    pub fn registered_keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.registered.iter()
    }
}

static GLOBAL_REGISTRY: LazyLock<Arc<FactoryRegistry>> =
    LazyLock::new(|| Arc::new(FactoryRegistry::new()));

/// Mapping from service key to factory
#[derive(Default)]
pub struct FactoryRegistry {
    factories: DashMap<ServiceKey, Factory>,
    warn_on_overwrite: AtomicBool,
}

impl FactoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static Arc<FactoryRegistry> {
        &GLOBAL_REGISTRY
    }

    /// Apply behaviour options
    pub fn apply_options(&self, options: &RegistryOptions) {
        self.warn_on_overwrite
            .store(options.warn_on_overwrite, Ordering::Relaxed);
    }

    /// Behaviour options currently in effect
    pub fn options(&self) -> RegistryOptions {
        RegistryOptions {
            warn_on_overwrite: self.warn_on_overwrite.load(Ordering::Relaxed),
        }
    }

    /// Run a configuration block against this registry
    ///
    /// Each registration is applied the moment it is made. An error stops
    /// the block and is returned as is; registrations made before it are
    /// kept. Registering a key that already exists replaces its factory.
    pub fn configure<F>(&self, configure: F) -> Result<()>
    where
        F: FnOnce(&mut RegistryBuilder<'_>) -> Result<()>,
    {
        let mut builder = RegistryBuilder {
            registry: self,
            registered: Vec::new(),
        };
        let outcome = configure(&mut builder);
        let count = builder.registered.len();
        match &outcome {
            Ok(()) => debug!(count, total = self.len(), "Service factories configured"),
            Err(e) => warn!(count, error = %e, "Service configuration stopped"),
        }
        outcome
    }

    fn insert(&self, key: ServiceKey, factory: Factory) {
        let replaced = self.factories.insert(key.clone(), factory).is_some();
        if replaced {
            if self.warn_on_overwrite.load(Ordering::Relaxed) {
                warn!(service = %key, "Service factory replaced");
            } else {
                debug!(service = %key, "Service factory replaced");
            }
        }
    }

    /// Snapshot of the current mapping
    pub fn factories(&self) -> BTreeMap<ServiceKey, Factory> {
        self.factories
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<ServiceKey> {
        let mut keys: Vec<ServiceKey> = self.factories.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Factory registered under `key`
    pub fn get(&self, key: &str) -> Option<Factory> {
        self.factories.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Remove every registered factory
    pub fn clear(&self) {
        self.factories.clear();
        debug!("Service factories cleared");
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Configure the global registry
pub fn configure<F>(configure: F) -> Result<()>
where
    F: FnOnce(&mut RegistryBuilder<'_>) -> Result<()>,
{
    FactoryRegistry::global().configure(configure)
}

/// Snapshot of the global registry's mapping
pub fn factories() -> BTreeMap<ServiceKey, Factory> {
    FactoryRegistry::global().factories()
}

/// Empty the global registry
pub fn clear() {
    FactoryRegistry::global().clear();
}
