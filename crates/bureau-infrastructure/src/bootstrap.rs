//! Startup wiring
//!
//! Loads configuration, installs logging and applies the registry options to
//! the global registry. Service registration itself stays with the caller:
//!
//! ```ignore
//! bureau_infrastructure::bootstrap()?;
//! bureau_application::registry::configure(|cfg| {
//!     cfg.register("mailer", Factory::from_fn(|_| Mailer::default()));
//!     Ok(())
//! })?;
//! ```

use bureau_application::FactoryRegistry;
use bureau_domain::error::Result;
use tracing::debug;

use crate::config::{BureauConfig, ConfigLoader};
use crate::logging::init_logging;

/// Bootstrap from the default configuration sources
pub fn bootstrap() -> Result<BureauConfig> {
    let config = ConfigLoader::new().load()?;
    bootstrap_with(&config)?;
    Ok(config)
}

/// Bootstrap from an already loaded configuration
pub fn bootstrap_with(config: &BureauConfig) -> Result<()> {
    init_logging(&config.logging)?;
    apply_registry_options(FactoryRegistry::global(), config);
    Ok(())
}

/// Apply the `registry` section to `registry`
pub fn apply_registry_options(registry: &FactoryRegistry, config: &BureauConfig) {
    registry.apply_options(&config.registry);
    debug!(options = ?config.registry, "Registry options applied");
}
