//! Opaque extension context.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The thing an extension extends.
///
/// The context is handed to factories and entry points unchanged. Hosts put
/// whatever they want in it; extensions downcast to the type they expect.
#[derive(Clone)]
pub struct ExtensionContext {
    value: Arc<dyn Any + Send + Sync>,
}

impl ExtensionContext {
    /// Wrap a host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// Wrap a value the host already shares.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self { value }
    }

    /// Context carrying nothing.
    pub fn empty() -> Self {
        Self::new(())
    }

    pub fn is_empty(&self) -> bool {
        self.value.is::<()>()
    }

    /// Borrow the wrapped value as `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Read `key` from a JSON object context.
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get::<serde_json::Value>()?
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Whether both handles point to the same host value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Default for ExtensionContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<serde_json::Value> for ExtensionContext {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for ExtensionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(json) = self.get::<serde_json::Value>() {
            return f.debug_tuple("ExtensionContext").field(json).finish();
        }
        if self.is_empty() {
            return f.write_str("ExtensionContext(())");
        }
        f.write_str("ExtensionContext(..)")
    }
}
