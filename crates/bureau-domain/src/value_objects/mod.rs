//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ServiceKey`] | Identifier a factory is registered under |
//! | [`ServiceInstance`] | Type-erased shared service value |
//! | [`ServiceArgs`] | Positional arguments passed to a factory |

/// Factory call arguments
pub mod args;
/// Type-erased service values
pub mod instance;
/// Service identifiers
pub mod key;

pub use args::ServiceArgs;
pub use instance::ServiceInstance;
pub use key::ServiceKey;
