//! Extension entry points.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use super::ExtensionContext;
use crate::error::BoxError;

type EntryFn = dyn Fn(ExtensionContext) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync;

/// A callable taking the extension context.
///
/// Entry points are always driven as futures. Synchronous closures are
/// wrapped with [`EntryPoint::sync`] and complete on first poll.
#[derive(Clone)]
pub struct EntryPoint {
    call: Arc<EntryFn>,
}

impl EntryPoint {
    /// Asynchronous entry point.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ExtensionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self {
            call: Arc::new(move |ctx: ExtensionContext| f(ctx).boxed()),
        }
    }

    /// Synchronous entry point.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&ExtensionContext) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            call: Arc::new(move |ctx: ExtensionContext| future::ready(f(&ctx)).boxed()),
        }
    }

    pub fn noop() -> Self {
        Self::sync(|_| Ok(()))
    }

    pub fn invoke(&self, ctx: ExtensionContext) -> BoxFuture<'static, Result<(), BoxError>> {
        (self.call)(ctx)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.call, &other.call)
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryPoint(..)")
    }
}
