use std::borrow::Borrow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::constants::{RESERVED_SERVICE_NAMES, SERVICE_IDENTIFIER_PATTERN};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SERVICE_IDENTIFIER_PATTERN).expect("identifier pattern is a valid regex")
});

/// Identifier a factory is registered under
///
/// Keys compare, hash and order by their string contents and are cheap to
/// clone. Any string is a valid key for typed registration; the dynamic
/// registration surface additionally requires [`ServiceKey::is_identifier`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Arc<str>);

impl ServiceKey {
    /// Create a key from any string
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is usable as an accessor name
    pub fn is_identifier(&self) -> bool {
        IDENTIFIER.is_match(&self.0)
    }

    /// Whether the key collides with a registry management operation
    pub fn is_reserved(&self) -> bool {
        RESERVED_SERVICE_NAMES.contains(&self.as_str())
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl Borrow<str> for ServiceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for ServiceKey {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&ServiceKey> for ServiceKey {
    fn from(key: &ServiceKey) -> Self {
        key.clone()
    }
}
