//! Resolved extension values.

use std::fmt;
use std::sync::Arc;

use super::{EntryPoint, RequireConfig};

/// A concrete extension, as produced by a module, a factory or the host.
///
/// An extension may be invocable itself (`call`), expose an `initialize`
/// entry point, or neither. It may also declare dependencies to load before
/// it is initialized, data it exports to the host, and a hook the host can run
/// once the whole application is assembled.
///
/// Clones share the same underlying value; see [`Extension::ptr_eq`].
#[derive(Clone)]
pub struct Extension {
    inner: Arc<ExtensionInner>,
}

#[derive(Clone)]
struct ExtensionInner {
    name: String,
    call: Option<EntryPoint>,
    initialize: Option<EntryPoint>,
    after_app_start: Option<EntryPoint>,
    require: Option<RequireConfig>,
    exports: serde_json::Value,
}

impl Extension {
    /// Plain extension value with no entry points.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ExtensionInner {
                name: name.into(),
                call: None,
                initialize: None,
                after_app_start: None,
                require: None,
                exports: serde_json::Value::Null,
            }),
        }
    }

    /// Extension that is itself invocable.
    pub fn callable(name: impl Into<String>, entry: EntryPoint) -> Self {
        let mut ext = Self::new(name);
        Arc::make_mut(&mut ext.inner).call = Some(entry);
        ext
    }

    pub fn with_initialize(mut self, entry: EntryPoint) -> Self {
        Arc::make_mut(&mut self.inner).initialize = Some(entry);
        self
    }

    pub fn with_after_app_start(mut self, entry: EntryPoint) -> Self {
        Arc::make_mut(&mut self.inner).after_app_start = Some(entry);
        self
    }

    pub fn with_require(mut self, require: RequireConfig) -> Self {
        Arc::make_mut(&mut self.inner).require = Some(require);
        self
    }

    pub fn with_exports(mut self, exports: serde_json::Value) -> Self {
        Arc::make_mut(&mut self.inner).exports = exports;
        self
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The extension's own call entry, if it is invocable.
    pub fn call_entry(&self) -> Option<&EntryPoint> {
        self.inner.call.as_ref()
    }

    pub fn initialize_entry(&self) -> Option<&EntryPoint> {
        self.inner.initialize.as_ref()
    }

    /// Hook for the host to run after the ready gate settles.
    pub fn after_app_start(&self) -> Option<&EntryPoint> {
        self.inner.after_app_start.as_ref()
    }

    pub fn require(&self) -> Option<&RequireConfig> {
        self.inner.require.as_ref()
    }

    pub fn exports(&self) -> &serde_json::Value {
        &self.inner.exports
    }

    pub fn is_callable(&self) -> bool {
        self.inner.call.is_some()
    }

    /// Whether both handles refer to the same extension value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.inner.name)
            .field("callable", &self.inner.call.is_some())
            .field("initialize", &self.inner.initialize.is_some())
            .field("after_app_start", &self.inner.after_app_start.is_some())
            .field("require", &self.inner.require)
            .field("exports", &self.inner.exports)
            .finish()
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
