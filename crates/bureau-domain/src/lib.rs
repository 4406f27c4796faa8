//! Domain layer for Service Bureau
//!
//! Holds the vocabulary shared by every other crate in the workspace:
//!
//! - [`ServiceKey`]: the opaque identifier a factory is registered under
//! - [`ServiceInstance`]: a type-erased, shared service value
//! - [`ServiceArgs`]: positional arguments handed to a factory
//! - [`error::Error`]: the error taxonomy surfaced by registry, resolver and accessors
//!
//! Nothing here knows about the registry or how services are resolved.

pub mod constants;
pub mod error;
pub mod value_objects;

pub use error::{Error, FactoryError, Result};
pub use value_objects::{ServiceArgs, ServiceInstance, ServiceKey};
