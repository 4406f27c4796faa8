//! Service Accessors
//!
//! Equips consumer types with one lazy, overridable, memoized accessor per
//! registered service.
//!
//! ## Composition
//!
//! An [`AccessorSet`] snapshots the registry's keys when it is composed,
//! usually once per consumer type. Keys registered afterwards get no
//! accessor on that type. Each consumer instance owns a [`ServiceCache`]
//! built from the set, holding one slot per key.
//!
//! ## Slot states
//!
//! ```text
//!            get()                 factory Ok
//! Uncached ─────────▶ Resolving ─────────────▶ Cached
//!    ▲                    │                      ▲ │
//!    └── factory Err ─────┘                      └─┘ set()
//!
//! set() from any state ──────────────────────────▶ Cached
//! ```
//!
//! Once a slot is cached, `get` returns the cached value and ignores the
//! arguments it was given. A caller passing different arguments after the
//! first successful resolution receives the first caller's instance.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread;

use bureau_domain::error::{Error, Result};
use bureau_domain::value_objects::{ServiceArgs, ServiceInstance, ServiceKey};
use tracing::{debug, trace};

use crate::resolver::{Locator, downcast_instance};

/// Keys a consumer type has accessors for, fixed at composition time
#[derive(Debug, Clone)]
pub struct AccessorSet {
    keys: Arc<[ServiceKey]>,
    locator: Locator,
}

impl AccessorSet {
    /// Snapshot the global registry
    pub fn compose() -> Self {
        Self::compose_with(Locator::new())
    }

    /// Snapshot the registry behind `locator`
    pub fn compose_with(locator: Locator) -> Self {
        let keys: Arc<[ServiceKey]> = locator.registry().keys().into();
        debug!(accessors = keys.len(), "Service accessors composed");
        Self { keys, locator }
    }

    pub fn keys(&self) -> &[ServiceKey] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k.as_str() == key)
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

/// Observable state of one accessor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No value yet; the next `get` resolves
    Uncached,
    /// A `get` is running the factory right now
    ///
    /// This is what a factory sees when it inspects the slot it is filling.
    Resolving,
    /// A resolved or injected value is held
    Cached,
}

#[derive(Default)]
struct Slot {
    value: Mutex<Option<ServiceInstance>>,
    resolving: AtomicBool,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<ServiceInstance>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the resolving flag however the factory call ends
struct ResolvingGuard<'a>(&'a AtomicBool);

impl<'a> ResolvingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Per-instance service cache
///
/// Each slot has its own lock, held while the factory runs, so concurrent
/// first reads of one key on one instance run the factory once and unrelated
/// keys never contend. A factory must not read the accessor it is producing.
pub struct ServiceCache {
    slots: HashMap<ServiceKey, Slot>,
    locator: Locator,
}

impl ServiceCache {
    /// Empty cache with one slot per key of `set`
    pub fn new(set: &AccessorSet) -> Self {
        Self {
            slots: set.keys().iter().map(|key| (key.clone(), Slot::default())).collect(),
            locator: set.locator().clone(),
        }
    }

    /// Accessor for `key`, if the consumer was composed with one
    pub fn accessor(&self, key: &str) -> Option<Accessor<'_>> {
        self.slots
            .get_key_value(key)
            .map(|(key, slot)| Accessor {
                key,
                slot,
                locator: &self.locator,
            })
    }

    /// All accessors, in key order
    pub fn accessors(&self) -> Vec<Accessor<'_>> {
        let mut accessors: Vec<Accessor<'_>> = self
            .slots
            .iter()
            .map(|(key, slot)| Accessor {
                key,
                slot,
                locator: &self.locator,
            })
            .collect();
        accessors.sort_by(|a, b| a.key.cmp(b.key));
        accessors
    }

    fn require(&self, key: &str) -> Result<Accessor<'_>> {
        self.accessor(key)
            .ok_or_else(|| Error::undefined_accessor(key))
    }

    /// Cached value for `key`, resolving it on first use
    pub fn get(&self, key: &str, args: &ServiceArgs) -> Result<ServiceInstance> {
        self.require(key)?.get(args)
    }

    /// Like [`ServiceCache::get`], downcast to `T`
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str, args: &ServiceArgs) -> Result<Arc<T>> {
        self.require(key)?.get_as(args)
    }

    /// Override the value for `key`
    pub fn set(&self, key: &str, value: ServiceInstance) -> Result<()> {
        self.require(key)?.set(value);
        Ok(())
    }

    pub fn state(&self, key: &str) -> Option<SlotState> {
        self.accessor(key).map(|accessor| accessor.state())
    }
}

impl fmt::Debug for ServiceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for accessor in self.accessors() {
            map.entry(accessor.key, &accessor.state());
        }
        map.finish()
    }
}

/// Getter/setter pair for one service on one consumer instance
#[derive(Clone, Copy)]
pub struct Accessor<'a> {
    key: &'a ServiceKey,
    slot: &'a Slot,
    locator: &'a Locator,
}

impl<'a> Accessor<'a> {
    pub fn key(&self) -> &'a ServiceKey {
        self.key
    }

    /// Return the cached value, or resolve with `args` and cache the result
    ///
    /// `args` are only used by the call that actually resolves. On failure
    /// nothing is cached and the next call resolves again.
    pub fn get(&self, args: &ServiceArgs) -> Result<ServiceInstance> {
        let mut slot = self.slot.lock();
        if let Some(instance) = slot.as_ref() {
            trace!(service = %self.key, "Service cache hit");
            return Ok(instance.clone());
        }

        let instance = {
            let _resolving = ResolvingGuard::enter(&self.slot.resolving);
            self.locator.resolve(self.key, args)?
        };
        debug!(service = %self.key, "Service cached");
        *slot = Some(instance.clone());
        Ok(instance)
    }

    /// Like [`Accessor::get`], downcast to `T`
    pub fn get_as<T: Any + Send + Sync>(&self, args: &ServiceArgs) -> Result<Arc<T>> {
        let instance = self.get(args)?;
        downcast_instance(self.key, &instance)
    }

    /// Store `value`, replacing whatever the slot held
    pub fn set(&self, value: ServiceInstance) {
        *self.slot.lock() = Some(value);
        debug!(service = %self.key, "Service injected");
    }

    /// Current state of the slot
    ///
    /// Never waits on a running factory. The slot lock is otherwise only held
    /// for a cache hit or a `set`, so a busy slot is retried.
    pub fn state(&self) -> SlotState {
        loop {
            if self.slot.resolving.load(Ordering::Acquire) {
                return SlotState::Resolving;
            }
            let held = match self.slot.value.try_lock() {
                Ok(value) => value.is_some(),
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
                Err(TryLockError::WouldBlock) => {
                    thread::yield_now();
                    continue;
                }
            };
            return if held {
                SlotState::Cached
            } else {
                SlotState::Uncached
            };
        }
    }
}

impl fmt::Debug for Accessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("key", self.key)
            .field("state", &self.state())
            .finish()
    }
}

/// Implemented by consumer types that embed a [`ServiceCache`]
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bureau_application::{AccessorSet, Factory, FactoryRegistry, Locator, ServiceCache, Services};
/// use bureau_domain::ServiceArgs;
///
/// let registry = Arc::new(FactoryRegistry::new());
/// registry
///     .configure(|cfg| {
///         cfg.register("clock", Factory::from_fn(|_| 42_u64));
///         Ok(())
///     })
///     .unwrap();
///
/// struct Report {
///     services: ServiceCache,
/// }
///
/// impl Services for Report {
///     fn service_cache(&self) -> &ServiceCache {
///         &self.services
///     }
/// }
///
/// let set = AccessorSet::compose_with(Locator::with_registry(registry));
/// let report = Report { services: ServiceCache::new(&set) };
/// assert_eq!(*report.service_as::<u64>("clock", &ServiceArgs::new()).unwrap(), 42);
/// ```
pub trait Services {
    fn service_cache(&self) -> &ServiceCache;

    /// Memoized service for `key`
    fn service(&self, key: &str, args: &ServiceArgs) -> Result<ServiceInstance> {
        self.service_cache().get(key, args)
    }

    /// Memoized service for `key`, downcast to `T`
    fn service_as<T: Any + Send + Sync>(&self, key: &str, args: &ServiceArgs) -> Result<Arc<T>> {
        self.service_cache().get_as(key, args)
    }

    /// Replace the service for `key`, e.g. with a test double
    fn inject_service(&self, key: &str, value: ServiceInstance) -> Result<()> {
        self.service_cache().set(key, value)
    }
}
