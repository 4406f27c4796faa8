//! Application Layer - Service Bureau
//!
//! Implements the registry, resolution and memoization mechanism:
//!
//! - [`registry`]: process-wide mapping from service key to [`Factory`],
//!   populated through [`FactoryRegistry::configure`]
//! - [`resolver`]: [`Locator`] turns a key and call arguments into a
//!   service instance, classifying the two lookup failures
//! - [`accessors`]: [`AccessorSet`] snapshots the registered keys for a
//!   consumer type and [`ServiceCache`] memoizes one instance per key on each
//!   consumer
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `bureau-domain`: keys, instances, arguments and errors
//! - Pure Rust libraries for logging, serialization and concurrent maps

pub mod accessors;
pub mod registry;
pub mod resolver;

pub use accessors::{Accessor, AccessorSet, ServiceCache, Services, SlotState};
pub use registry::{Factory, FactoryRegistry, RegistrationCall, RegistryBuilder, RegistryOptions};
pub use resolver::{Locator, get_service};
