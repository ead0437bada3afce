//! Extension descriptors.

use std::fmt;

use uuid::Uuid;

use super::{ExtensionContext, ExtensionRef};

/// Identity of a descriptor.
///
/// Assigned once on construction and kept by clones, so a cloned descriptor
/// is the same registration as its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorId(Uuid);

impl DescriptorId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The `{ ref, context }` pair describing one extension to load.
#[derive(Debug, Clone)]
pub struct ExtensionDescriptor {
    id: DescriptorId,
    reference: ExtensionRef,
    context: ExtensionContext,
}

impl ExtensionDescriptor {
    pub fn new(reference: impl Into<ExtensionRef>, context: ExtensionContext) -> Self {
        Self {
            id: DescriptorId::new(),
            reference: reference.into(),
            context,
        }
    }

    /// Descriptor with an empty context.
    pub fn from_ref(reference: impl Into<ExtensionRef>) -> Self {
        Self::new(reference, ExtensionContext::empty())
    }

    pub fn id(&self) -> DescriptorId {
        self.id
    }

    pub fn reference(&self) -> &ExtensionRef {
        &self.reference
    }

    pub fn context(&self) -> &ExtensionContext {
        &self.context
    }

    /// Identity comparison.
    pub fn is_same(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
