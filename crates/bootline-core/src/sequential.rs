//! Strictly ordered extension loading.
//!
//! Descriptors are processed one at a time, in registration order. Extension
//! N+1 is not touched before extension N has been resolved and initialized;
//! the first failure stops the run.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info};

use bootline_protocols::error::ExtensionError;
use bootline_protocols::extension::{Extension, ExtensionDescriptor};

use crate::gate::{ReadyExtensions, ReadyGate};
use crate::initializer::Initializer;
use crate::resolver::Resolver;

/// Drives the resolver and initializer across a descriptor queue.
pub struct SequentialLoader {
    resolver: Arc<Resolver>,
}

impl SequentialLoader {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }

    /// Load every descriptor in order.
    ///
    /// Returns the extensions in registration order, or the first error.
    /// Descriptors after a failing one are never resolved.
    pub async fn run(
        &self,
        descriptors: Vec<ExtensionDescriptor>,
    ) -> Result<ReadyExtensions, ExtensionError> {
        let mut queue = VecDeque::from(descriptors);
        let mut loaded = Vec::with_capacity(queue.len());

        while let Some(descriptor) = queue.pop_front() {
            let reference = descriptor.reference().to_string();
            debug!(reference = %reference, position = loaded.len(), "Loading extension");

            let step = AssertUnwindSafe(self.load_one(&descriptor))
                .catch_unwind()
                .await;
            match step {
                Ok(Ok(extension)) => loaded.push(extension),
                Ok(Err(err)) => {
                    error!(
                        reference = %reference,
                        error = %err,
                        skipped = queue.len(),
                        "Extension failed; aborting load sequence"
                    );
                    return Err(err);
                }
                Err(payload) => {
                    let err = ExtensionError::unknown(reference.as_str(), panic_detail(payload));
                    error!(
                        reference = %reference,
                        error = %err,
                        skipped = queue.len(),
                        "Extension panicked; aborting load sequence"
                    );
                    return Err(err);
                }
            }
        }

        Ok(loaded)
    }

    /// Run the queue and settle `gate` with the result.
    pub async fn drive(self, descriptors: Vec<ExtensionDescriptor>, gate: ReadyGate) {
        let total = descriptors.len();
        match self.run(descriptors).await {
            Ok(extensions) => {
                info!(count = total, "All extensions loaded");
                gate.resolve(extensions);
            }
            Err(err) => {
                gate.reject(err);
            }
        }
    }

    async fn load_one(
        &self,
        descriptor: &ExtensionDescriptor,
    ) -> Result<Option<Extension>, ExtensionError> {
        let extension = self.resolver.resolve(descriptor).await?;
        Initializer::initialize(extension, descriptor.context()).await
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> Option<String> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return Some((*message).to_string());
    }
    payload.downcast_ref::<String>().cloned()
}

#[cfg(test)]
#[path = "sequential_tests.rs"]
mod tests;
