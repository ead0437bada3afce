//! In-process module loader.
//!
//! Modules are defined under a location, either as a ready export or as an
//! async provider. Requests map names to locations through the shared
//! [`ModulePaths`] table, load each module once and cache its export.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use bootline_protocols::error::{BoxError, LoaderError};
use bootline_protocols::extension::ModuleExport;
use bootline_protocols::loader::{ModuleLoader, ModulePaths};

type ProviderFn = dyn Fn() -> BoxFuture<'static, Result<ModuleExport, BoxError>> + Send + Sync;

#[derive(Clone)]
enum ModuleSource {
    Ready(ModuleExport),
    Provider(Arc<ProviderFn>),
}

/// Module loader backed by modules defined in-process.
pub struct ModuleCatalog {
    paths: ModulePaths,
    sources: DashMap<String, ModuleSource>,
    loaded: DashMap<String, ModuleExport>,
}

impl ModuleCatalog {
    pub fn new(paths: ModulePaths) -> Self {
        Self {
            paths,
            sources: DashMap::new(),
            loaded: DashMap::new(),
        }
    }

    pub fn paths(&self) -> &ModulePaths {
        &self.paths
    }

    /// Define a module whose export is already known.
    pub fn define(&self, location: impl Into<String>, export: impl Into<ModuleExport>) -> &Self {
        self.sources
            .insert(location.into(), ModuleSource::Ready(export.into()));
        self
    }

    /// Define a module produced asynchronously on first request.
    pub fn define_async<F, Fut>(&self, location: impl Into<String>, provider: F) -> &Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ModuleExport, BoxError>> + Send + 'static,
    {
        let provider: Arc<ProviderFn> = Arc::new(move || provider().boxed());
        self.sources
            .insert(location.into(), ModuleSource::Provider(provider));
        self
    }

    pub fn contains(&self, location: &str) -> bool {
        self.sources.contains_key(location)
    }

    /// Whether the module at `location` has been loaded.
    pub fn is_loaded(&self, location: &str) -> bool {
        self.loaded.contains_key(location)
    }

    /// Defined locations, sorted.
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self.sources.iter().map(|e| e.key().clone()).collect();
        locations.sort();
        locations
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl ModuleLoader for ModuleCatalog {
    async fn request(&self, name: &str) -> Result<ModuleExport, LoaderError> {
        let location = self.paths.resolve(name);
        if let Some(export) = self.loaded.get(&location) {
            return Ok(export.value().clone());
        }

        let source = self
            .sources
            .get(&location)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LoaderError::not_found(name, location.as_str()))?;

        let export = match source {
            ModuleSource::Ready(export) => export,
            ModuleSource::Provider(provider) => provider()
                .await
                .map_err(|cause| LoaderError::failed(location.as_str(), cause))?,
        };

        debug!(module = %name, location = %location, "Module loaded");
        let export = self.loaded.entry(location).or_insert(export).value().clone();
        Ok(export)
    }
}
