//! Extension resolution.
//!
//! Turns a descriptor's reference into a concrete extension value, loading the
//! module and any dependencies the extension declares.

use std::sync::Arc;

use tracing::{debug, error, warn};

use bootline_protocols::error::{ExtensionError, LoaderError};
use bootline_protocols::extension::{
    Extension, ExtensionDescriptor, ExtensionRef, ModuleExport, RequireConfig,
};
use bootline_protocols::loader::{ModuleLoader, ModulePaths};

/// Resolves extension references against a module loader.
pub struct Resolver {
    loader: Arc<dyn ModuleLoader>,
    paths: ModulePaths,
}

impl Resolver {
    /// Create a resolver.
    ///
    /// `paths` is the host's location table; dependency tables declared by
    /// extensions are merged into it.
    pub fn new(loader: Arc<dyn ModuleLoader>, paths: ModulePaths) -> Self {
        Self { loader, paths }
    }

    pub fn paths(&self) -> &ModulePaths {
        &self.paths
    }

    /// Resolve `descriptor` to its extension value.
    ///
    /// Returns `Ok(None)` when the module or factory produced nothing.
    pub async fn resolve(
        &self,
        descriptor: &ExtensionDescriptor,
    ) -> Result<Option<Extension>, ExtensionError> {
        let reference = descriptor.reference();
        let export = match reference {
            ExtensionRef::ByName(name) => {
                debug!(reference = %name, "Requesting extension module");
                self.loader
                    .request(name)
                    .await
                    .map_err(|err| load_failure(reference, err))?
            }
            ExtensionRef::ByValue(ext) => ModuleExport::Value(ext.clone()),
            ExtensionRef::ByFactory(factory) => ModuleExport::Factory(factory.clone()),
        };

        let Some(extension) = export.into_extension(descriptor.context()) else {
            debug!(reference = %reference, "Extension resolved to nothing");
            return Ok(None);
        };

        if let Some(require) = extension.require() {
            self.require_dependencies(reference, require).await?;
        }

        Ok(Some(extension))
    }

    async fn require_dependencies(
        &self,
        reference: &ExtensionRef,
        require: &RequireConfig,
    ) -> Result<(), ExtensionError> {
        if require.is_empty() {
            return Ok(());
        }

        let overridden = self
            .paths
            .merge(&require.paths)
            .map_err(|err| load_failure(reference, err))?;
        for name in &overridden {
            warn!(
                reference = %reference,
                module = %name,
                "Module location overridden by extension dependency table"
            );
        }

        let names = require.dependency_names();
        debug!(reference = %reference, dependencies = ?names, "Loading extension dependencies");
        self.loader
            .request_all(&names)
            .await
            .map_err(|err| load_failure(reference, err))?;
        Ok(())
    }
}

fn load_failure(reference: &ExtensionRef, err: LoaderError) -> ExtensionError {
    error!(reference = %reference, error = %err, "Error loading extension");
    ExtensionError::load(reference.to_string(), err)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
