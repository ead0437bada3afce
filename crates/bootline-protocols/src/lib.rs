//! # Bootline Protocols
//!
//! Data model and collaborator traits for the Bootline extension manager.
//! Contains no loading logic of its own.
//!
//! ## Core Types
//!
//! - [`ExtensionDescriptor`] - What to load (`ExtensionRef`) and what it extends (`ExtensionContext`)
//! - [`Extension`] - A resolved extension value and its entry points
//! - [`ModuleLoader`] - Asynchronous source of module exports
//! - [`ModulePaths`] - Host-owned module location table
//! - [`ExtensionError`] - Failures surfaced by the manager

pub mod error;
pub mod extension;
pub mod loader;

pub use error::{BoxError, ExtensionError, LoaderError, SharedError};
pub use extension::{
    DescriptorId, EntryPoint, Extension, ExtensionContext, ExtensionDescriptor, ExtensionFactory,
    ExtensionRef, ModuleExport, RequireConfig,
};
pub use loader::{ConflictPolicy, ModuleLoader, ModulePaths};
