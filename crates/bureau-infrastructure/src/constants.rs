//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "bureau.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "service-bureau";

/// Environment variable prefix for configuration
///
/// Nested keys are separated by a double underscore, e.g.
/// `BUREAU__LOGGING__LEVEL=debug`.
pub const CONFIG_ENV_PREFIX: &str = "BUREAU__";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "BUREAU_LOG";

/// File stem used when a log directory is configured without a file name
pub const DEFAULT_LOG_FILE_STEM: &str = "bureau";
