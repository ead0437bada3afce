//! Error types for the Bootline protocol layer.

mod extension;
mod loader;

pub use extension::*;
pub use loader::*;
