//! Infrastructure layer for Service Bureau
//!
//! Cross-cutting technical concerns around the registry:
//!
//! - [`config`]: layered configuration (defaults, TOML file, environment)
//! - [`logging`]: `tracing` subscriber setup
//! - [`error_ext`]: context helpers converting foreign errors into domain errors
//! - [`bootstrap`]: one-call startup applying a loaded configuration

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use bootstrap::{bootstrap, bootstrap_with};
pub use config::{BureauConfig, ConfigLoader, LoggingConfig};
