//! Error handling types

use thiserror::Error;

use crate::value_objects::ServiceKey;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by a factory's own body
///
/// The resolver hands these back untouched inside [`Error::Factory`].
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Service Bureau
#[derive(Error, Debug)]
pub enum Error {
    /// No factory is registered under the requested key
    #[error("Cannot locate factory for '{key}' - please check your configuration")]
    UnknownService {
        /// The key that was looked up
        key: ServiceKey,
    },

    /// A value is registered under the key but it cannot be invoked
    #[error("The factory registered for '{key}' is not callable")]
    UncallableFactory {
        /// The key whose registered value is not a factory
        key: ServiceKey,
    },

    /// A registration violated the arity/shape contract, or configuration failed to load
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error returned by the factory itself, passed through unchanged
    #[error(transparent)]
    Factory(FactoryError),

    /// The consumer was composed without an accessor for this key
    #[error("No accessor for service '{key}' was composed on this consumer")]
    UndefinedAccessor {
        /// The key that has no accessor
        key: ServiceKey,
    },

    /// The resolved instance is not of the requested type
    #[error("Service '{key}' is a {actual}, not a {expected}")]
    ServiceTypeMismatch {
        /// The key that was resolved
        key: ServiceKey,
        /// Type the caller asked for
        expected: &'static str,
        /// Type the instance was created with
        actual: &'static str,
    },

    /// A factory argument is missing or has an unexpected type
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Creation methods
impl Error {
    /// Create an unknown service error
    pub fn unknown_service<K: Into<ServiceKey>>(key: K) -> Self {
        Self::UnknownService { key: key.into() }
    }

    /// Create an uncallable factory error
    pub fn uncallable_factory<K: Into<ServiceKey>>(key: K) -> Self {
        Self::UncallableFactory { key: key.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap an error produced by a factory body
    ///
    /// A factory that itself resolved another service and failed returns a
    /// boxed [`Error`]; that error is unboxed so callers see the original
    /// variant rather than a nested `Factory`.
    pub fn factory(err: FactoryError) -> Self {
        match err.downcast::<Error>() {
            Ok(inner) => *inner,
            Err(other) => Self::Factory(other),
        }
    }

    /// Create an undefined accessor error
    pub fn undefined_accessor<K: Into<ServiceKey>>(key: K) -> Self {
        Self::UndefinedAccessor { key: key.into() }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Inspection methods
impl Error {
    /// Whether the key had no registered factory
    pub fn is_unknown_service(&self) -> bool {
        matches!(self, Self::UnknownService { .. })
    }

    /// Whether the registered value could not be invoked
    pub fn is_uncallable_factory(&self) -> bool {
        matches!(self, Self::UncallableFactory { .. })
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether the error came from a factory body
    pub fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }

    /// The service key this error is about, if any
    pub fn service_key(&self) -> Option<&ServiceKey> {
        match self {
            Self::UnknownService { key }
            | Self::UncallableFactory { key }
            | Self::UndefinedAccessor { key }
            | Self::ServiceTypeMismatch { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Recover the factory's original error
    pub fn into_factory_error(self) -> std::result::Result<FactoryError, Self> {
        match self {
            Self::Factory(err) => Ok(err),
            other => Err(other),
        }
    }
}
