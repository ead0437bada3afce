//! The extension manager.
//!
//! Hosts register descriptors with [`ExtensionManager::add`] and then call
//! [`ExtensionManager::init`] exactly once. `init` seals the registry and
//! loads every extension in registration order on a background task; the
//! returned [`ReadySignal`] and the `on_ready`/`on_failure` hooks report the
//! outcome.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info};

use bootline_protocols::error::ExtensionError;
use bootline_protocols::extension::{Extension, ExtensionDescriptor};
use bootline_protocols::loader::{ModuleLoader, ModulePaths};

use crate::gate::{ReadyGate, ReadySignal};
use crate::resolver::Resolver;
use crate::sequential::SequentialLoader;

/// Manager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// Accepting descriptors.
    Open,
    /// Sealed; extensions are loading.
    Running,
    /// Every extension loaded.
    Ready,
    /// Loading stopped on an error.
    Failed,
}

#[derive(Default)]
struct Registry {
    descriptors: Vec<ExtensionDescriptor>,
    sealed: bool,
}

/// Registers extension descriptors and loads them in order.
pub struct ExtensionManager {
    registry: Mutex<Registry>,
    gate: ReadyGate,
    resolver: Arc<Resolver>,
}

impl ExtensionManager {
    /// Create a manager loading named modules through `loader`.
    ///
    /// `paths` should be the same table the loader resolves names with.
    pub fn new(loader: Arc<dyn ModuleLoader>, paths: ModulePaths) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            gate: ReadyGate::new(),
            resolver: Arc::new(Resolver::new(loader, paths)),
        }
    }

    /// Register a descriptor.
    ///
    /// Fails with `DuplicateExtension` if this descriptor (or a clone of it)
    /// is already registered, and with `AlreadyInitialized` once `init` has
    /// been called.
    pub fn add(&self, descriptor: ExtensionDescriptor) -> Result<&Self, ExtensionError> {
        let mut registry = self.registry.lock();

        if registry
            .descriptors
            .iter()
            .any(|existing| existing.is_same(&descriptor))
        {
            return Err(ExtensionError::DuplicateExtension(
                descriptor.reference().to_string(),
            ));
        }
        if registry.sealed {
            return Err(ExtensionError::AlreadyInitialized);
        }

        debug!(
            reference = %descriptor.reference(),
            id = %descriptor.id(),
            position = registry.descriptors.len(),
            "Extension registered"
        );
        registry.descriptors.push(descriptor);
        Ok(self)
    }

    /// Seal the registry and start loading.
    ///
    /// Returns a signal resolving to the loaded extensions in registration
    /// order. A second call fails with `AlreadyInitialized` and leaves the
    /// running load untouched. Outside a tokio runtime the call fails with
    /// `NoRuntime` and the registry stays open.
    pub fn init(&self) -> Result<ReadySignal, ExtensionError> {
        let (runtime, descriptors) = {
            let mut registry = self.registry.lock();
            if registry.sealed {
                return Err(ExtensionError::AlreadyInitialized);
            }
            let runtime =
                Handle::try_current().map_err(|err| ExtensionError::NoRuntime(err.to_string()))?;
            registry.sealed = true;
            (runtime, registry.descriptors.clone())
        };

        info!(count = descriptors.len(), "Initializing extensions");
        let loader = SequentialLoader::new(self.resolver.clone());
        runtime.spawn(loader.drive(descriptors, self.gate.clone()));

        Ok(self.gate.signal())
    }

    /// Run `callback` with the loaded extensions once loading succeeds.
    pub fn on_ready<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&[Option<Extension>]) + Send + 'static,
    {
        self.gate.on_ready(callback);
        self
    }

    /// Run `callback` with the error once loading fails.
    pub fn on_failure<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&ExtensionError) + Send + 'static,
    {
        self.gate.on_failure(callback);
        self
    }

    pub fn state(&self) -> ManagerState {
        if !self.is_sealed() {
            return ManagerState::Open;
        }
        match self.gate.outcome() {
            None => ManagerState::Running,
            Some(Ok(_)) => ManagerState::Ready,
            Some(Err(_)) => ManagerState::Failed,
        }
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.registry.lock().descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.lock().descriptors.is_empty()
    }

    pub fn is_sealed(&self) -> bool {
        self.registry.lock().sealed
    }

    pub fn gate(&self) -> &ReadyGate {
        &self.gate
    }

    pub fn paths(&self) -> &ModulePaths {
        self.resolver.paths()
    }
}

impl fmt::Debug for ExtensionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("ExtensionManager")
            .field("registered", &registry.descriptors.len())
            .field("sealed", &registry.sealed)
            .field("settled", &self.gate.is_settled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
