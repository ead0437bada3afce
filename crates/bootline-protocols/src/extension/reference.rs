//! Extension references and module exports.

use std::fmt;
use std::sync::Arc;

use super::{Extension, ExtensionContext};

type FactoryFn = dyn Fn(&ExtensionContext) -> Option<Extension> + Send + Sync;

/// Computes an extension from its context.
///
/// A factory may decline to produce anything; the descriptor then resolves to
/// an empty slot.
#[derive(Clone)]
pub struct ExtensionFactory {
    name: String,
    build: Arc<FactoryFn>,
}

impl ExtensionFactory {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&ExtensionContext) -> Option<Extension> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build(&self, ctx: &ExtensionContext) -> Option<Extension> {
        (self.build)(ctx)
    }
}

impl fmt::Debug for ExtensionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionFactory")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// What a module evaluates to.
#[derive(Debug, Clone)]
pub enum ModuleExport {
    /// An extension usable as-is.
    Value(Extension),
    /// A factory to call with the descriptor's context.
    Factory(ExtensionFactory),
    /// The module produced nothing.
    Empty,
}

impl ModuleExport {
    /// Turn the export into the extension for `ctx`.
    pub fn into_extension(self, ctx: &ExtensionContext) -> Option<Extension> {
        match self {
            Self::Value(ext) => Some(ext),
            Self::Factory(factory) => factory.build(ctx),
            Self::Empty => None,
        }
    }
}

impl From<Extension> for ModuleExport {
    fn from(ext: Extension) -> Self {
        Self::Value(ext)
    }
}

impl From<ExtensionFactory> for ModuleExport {
    fn from(factory: ExtensionFactory) -> Self {
        Self::Factory(factory)
    }
}

/// How to obtain an extension.
#[derive(Debug, Clone)]
pub enum ExtensionRef {
    /// Located asynchronously by the module loader.
    ByName(String),
    /// Used as-is.
    ByValue(Extension),
    /// Computed from the descriptor's context.
    ByFactory(ExtensionFactory),
}

impl fmt::Display for ExtensionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => f.write_str(name),
            Self::ByValue(ext) => write!(f, "value:{}", ext.name()),
            Self::ByFactory(factory) => write!(f, "factory:{}", factory.name()),
        }
    }
}

impl From<&str> for ExtensionRef {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_string())
    }
}

impl From<String> for ExtensionRef {
    fn from(name: String) -> Self {
        Self::ByName(name)
    }
}

impl From<Extension> for ExtensionRef {
    fn from(ext: Extension) -> Self {
        Self::ByValue(ext)
    }
}

impl From<ExtensionFactory> for ExtensionRef {
    fn from(factory: ExtensionFactory) -> Self {
        Self::ByFactory(factory)
    }
}
