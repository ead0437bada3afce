//! Extension protocol definitions.
//!
//! An extension is described by an [`ExtensionDescriptor`]: a reference saying
//! how to obtain it and a context saying what it extends.

mod context;
mod descriptor;
mod entry;
mod reference;
mod require;
mod value;

pub use context::*;
pub use descriptor::*;
pub use entry::*;
pub use reference::*;
pub use require::*;
pub use value::*;
