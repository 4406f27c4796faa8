use std::any::{Any, type_name};

use crate::error::{Error, Result};
use crate::value_objects::ServiceInstance;

/// Positional arguments handed to a factory
///
/// Arguments are type-erased; factories read them back with
/// [`ServiceArgs::arg`].
///
/// # Example
///
/// ```
/// use bureau_domain::{ServiceArgs, service_args};
///
/// let args = service_args!["Ann", 3_u8];
/// assert_eq!(args.arg::<&str>(0).unwrap(), &"Ann");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceArgs {
    values: Vec<ServiceInstance>,
}

impl ServiceArgs {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Append a value in place
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(ServiceInstance::new(value));
    }

    /// Append an already type-erased value
    pub fn push_instance(&mut self, value: ServiceInstance) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw argument at `index`
    pub fn get(&self, index: usize) -> Option<&ServiceInstance> {
        self.values.get(index)
    }

    /// Typed argument at `index`
    pub fn arg<T: Any>(&self, index: usize) -> Result<&T> {
        let value = self.values.get(index).ok_or_else(|| {
            Error::invalid_argument(format!(
                "expected an argument at position {index}, got {} argument(s)",
                self.values.len()
            ))
        })?;

        value.downcast_ref::<T>().ok_or_else(|| {
            Error::invalid_argument(format!(
                "argument {index} is a {}, not a {}",
                value.type_name(),
                type_name::<T>()
            ))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceInstance> {
        self.values.iter()
    }
}

impl FromIterator<ServiceInstance> for ServiceArgs {
    fn from_iter<I: IntoIterator<Item = ServiceInstance>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Build [`ServiceArgs`] from a list of values
#[macro_export]
macro_rules! service_args {
    () => {
        $crate::ServiceArgs::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::ServiceArgs::new()$(.with($value))+
    };
}
