//! # Service Bureau
//!
//! A small service locator: register named factories once, then obtain a
//! lazily constructed, memoized instance of a service from any consumer, or
//! inject a replacement (e.g. a test double) without touching the wiring.
//!
//! ## Example
//!
//! ```
//! use service_bureau::{Factory, ServiceCache, service_accessors, service_args};
//!
//! service_bureau::registry::configure(|cfg| {
//!     cfg.register(
//!         "greeter",
//!         Factory::try_from_fn(|args| args.arg::<&str>(0).map(|name| format!("hi {name}"))),
//!     );
//!     Ok(())
//! })
//! .unwrap();
//!
//! struct Frontdesk {
//!     services: ServiceCache,
//! }
//!
//! service_accessors! {
//!     impl Frontdesk [services] {
//!         greeter / set_greeter: String;
//!     }
//! }
//!
//! let desk = Frontdesk { services: ServiceCache::new(Frontdesk::accessor_set()) };
//! assert_eq!(*desk.greeter(&service_args!["Ann"]).unwrap(), "hi Ann");
//! // memoized: the first call's instance is returned, later arguments are ignored
//! assert_eq!(*desk.greeter(&service_args!["Bob"]).unwrap(), "hi Ann");
//! ```
//!
//! ## Memoization and arguments
//!
//! An accessor runs its factory at most once per consumer instance, with the
//! arguments of the first successful call. Every later call returns that
//! instance regardless of the arguments it passes.
//!
//! ## Architecture
//!
//! - `domain` - keys, instances, arguments and errors
//! - `application` - registry, resolver and accessors
//! - `infrastructure` - configuration loading and logging

#[doc(hidden)]
pub mod macros;

/// Domain layer - keys, instances, arguments and errors
pub mod domain {
    pub use bureau_domain::*;
}

/// Application layer - registry, resolver and accessors
pub mod application {
    pub use bureau_application::*;
}

/// Infrastructure layer - configuration and logging
pub mod infrastructure {
    pub use bureau_infrastructure::*;
}

pub use bureau_application::{accessors, registry, resolver};
pub use bureau_domain::{Error, FactoryError, Result, ServiceArgs, ServiceInstance, ServiceKey, service_args};

pub use bureau_application::{
    Accessor, AccessorSet, Factory, FactoryRegistry, Locator, RegistrationCall, RegistryBuilder,
    RegistryOptions, ServiceCache, Services, SlotState, get_service,
};
pub use bureau_infrastructure::{BureauConfig, ConfigLoader, bootstrap, bootstrap_with};
