//! Configuration
//!
//! [`BureauConfig`] is loaded by [`ConfigLoader`] from defaults, an optional
//! TOML file and `BUREAU__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{BureauConfig, LoggingConfig};
