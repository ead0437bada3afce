//! Module loader protocol.
//!
//! The loader turns module names into exports. Location configuration lives
//! in [`ModulePaths`], which the host owns and shares with both its loader and
//! the resolver.

mod paths;

pub use paths::*;

use async_trait::async_trait;

use crate::error::LoaderError;
use crate::extension::ModuleExport;

#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load the module registered under `name`.
    async fn request(&self, name: &str) -> Result<ModuleExport, LoaderError>;

    /// Load several modules; exports come back in the order of `names`.
    ///
    /// Fails with the first error encountered.
    async fn request_all(&self, names: &[String]) -> Result<Vec<ModuleExport>, LoaderError> {
        futures::future::try_join_all(names.iter().map(|name| self.request(name))).await
    }
}
