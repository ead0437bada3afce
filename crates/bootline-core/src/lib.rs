//! # Bootline Core
//!
//! Sequential extension manager for the Bootline framework.
//!
//! ## Components
//!
//! - [`ExtensionManager`] - Descriptor registry, one-shot `init` and ready hooks
//! - [`ReadyGate`] - One-shot completion signal shared by waiters and subscribers
//! - [`SequentialLoader`] - Loads descriptors one at a time, stopping on the first failure
//! - [`Resolver`] - Turns an extension reference into a value, loading dependencies
//! - [`Initializer`] - Runs an extension's entry point
//! - [`ModuleCatalog`] - In-process [`ModuleLoader`](bootline_protocols::ModuleLoader)
//!
//! ## Example
//!
//! ```ignore
//! let catalog = Arc::new(ModuleCatalog::new(ModulePaths::new()));
//! catalog.define("ext-one", Extension::new("ext-one"));
//!
//! let manager = ExtensionManager::new(catalog.clone(), catalog.paths().clone());
//! manager.add(ExtensionDescriptor::from_ref("ext-one"))?;
//! let extensions = manager.init()?.await?;
//! ```

pub mod catalog;
pub mod gate;
pub mod initializer;
pub mod manager;
pub mod resolver;
pub mod sequential;

pub use catalog::ModuleCatalog;
pub use gate::{ReadyExtensions, ReadyGate, ReadyOutcome, ReadySignal};
pub use initializer::{EntryKind, Initializer};
pub use manager::{ExtensionManager, ManagerState};
pub use resolver::Resolver;
pub use sequential::SequentialLoader;
