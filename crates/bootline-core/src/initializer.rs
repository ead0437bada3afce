//! Extension initialization.

use tracing::debug;

use bootline_protocols::error::ExtensionError;
use bootline_protocols::extension::{EntryPoint, Extension, ExtensionContext};

/// Which entry point an extension is initialized through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The extension value itself is invocable.
    Call,
    /// The extension exposes an `initialize` entry point.
    Initialize,
    /// Neither; nothing runs.
    Noop,
}

/// Picks and runs an extension's initialization entry point.
pub struct Initializer;

impl Initializer {
    /// Entry point for `extension`: its own call entry first, then
    /// `initialize`, then a no-op.
    pub fn entry_point(extension: &Extension) -> (EntryKind, EntryPoint) {
        if let Some(entry) = extension.call_entry() {
            return (EntryKind::Call, entry.clone());
        }
        if let Some(entry) = extension.initialize_entry() {
            return (EntryKind::Initialize, entry.clone());
        }
        (EntryKind::Noop, EntryPoint::noop())
    }

    /// Initialize a resolved extension.
    ///
    /// An empty slot succeeds immediately: the module is assumed to have done
    /// its work while loading. Otherwise the entry point runs with `context`
    /// and the original extension value is handed back once it completes.
    pub async fn initialize(
        extension: Option<Extension>,
        context: &ExtensionContext,
    ) -> Result<Option<Extension>, ExtensionError> {
        let Some(extension) = extension else {
            return Ok(None);
        };

        let (kind, entry) = Self::entry_point(&extension);
        debug!(extension = %extension.name(), entry = ?kind, "Initializing extension");
        entry
            .invoke(context.clone())
            .await
            .map_err(|cause| ExtensionError::init(extension.name(), cause))?;

        Ok(Some(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use bootline_protocols::error::BoxError;

    fn counting_entry(counter: Arc<AtomicUsize>) -> EntryPoint {
        EntryPoint::sync(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_empty_slot_short_circuits() {
        let result = Initializer::initialize(None, &ExtensionContext::empty()).await;
        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_call_entry_takes_priority() {
        let calls = Arc::new(AtomicUsize::new(0));
        let inits = Arc::new(AtomicUsize::new(0));
        let ext = Extension::callable("both", counting_entry(calls.clone()))
            .with_initialize(counting_entry(inits.clone()));

        assert_eq!(Initializer::entry_point(&ext).0, EntryKind::Call);
        Initializer::initialize(Some(ext), &ExtensionContext::empty())
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(inits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_initialize_entry_used_when_not_callable() {
        let inits = Arc::new(AtomicUsize::new(0));
        let ext = Extension::new("init-only").with_initialize(counting_entry(inits.clone()));

        assert_eq!(Initializer::entry_point(&ext).0, EntryKind::Initialize);
        Initializer::initialize(Some(ext), &ExtensionContext::empty())
            .await
            .unwrap();
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_plain_value_uses_noop() {
        let ext = Extension::new("plain");
        assert_eq!(Initializer::entry_point(&ext).0, EntryKind::Noop);
        let result = Initializer::initialize(Some(ext.clone()), &ExtensionContext::empty())
            .await
            .unwrap();
        assert!(result.unwrap().ptr_eq(&ext));
    }

    #[tokio::test]
    async fn test_resolves_with_original_value_after_async_entry() {
        let ext = Extension::new("slow").with_initialize(EntryPoint::new(|_| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok::<(), BoxError>(())
        }));

        let result = Initializer::initialize(Some(ext.clone()), &ExtensionContext::empty())
            .await
            .unwrap();
        assert!(result.unwrap().ptr_eq(&ext));
    }

    #[tokio::test]
    async fn test_entry_receives_context() {
        let ctx = ExtensionContext::new(String::from("sandbox"));
        let expected = ctx.clone();
        let ext = Extension::new("ctx").with_initialize(EntryPoint::sync(move |ctx| {
            if ctx.ptr_eq(&expected) {
                Ok(())
            } else {
                Err("unexpected context".into())
            }
        }));

        assert!(Initializer::initialize(Some(ext), &ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_entry_failure_is_wrapped() {
        let ext = Extension::new("broken")
            .with_initialize(EntryPoint::sync(|_| Err("bad config".into())));

        let err = Initializer::initialize(Some(ext), &ExtensionContext::empty())
            .await
            .unwrap_err();
        match err {
            ExtensionError::Init { reference, cause } => {
                assert_eq!(reference, "broken");
                assert_eq!(cause.to_string(), "bad config");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
