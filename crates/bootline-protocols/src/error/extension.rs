//! Extension-related errors.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error returned by extension entry points, factories and module providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared underlying cause.
///
/// Causes are reference counted so that a settled failure can be handed to
/// every subscriber of the ready gate.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Error)]
pub enum ExtensionError {
    #[error("Extension already registered: {0}. Extensions can only be added once")]
    DuplicateExtension(String),

    #[error("Extension initialization already started")]
    AlreadyInitialized,

    #[error("No async runtime to load extensions on: {0}")]
    NoRuntime(String),

    #[error("Error loading extension {reference}: {cause}")]
    Load {
        reference: String,
        #[source]
        cause: SharedError,
    },

    #[error("Extension initialization failed for {reference}: {cause}")]
    Init {
        reference: String,
        #[source]
        cause: SharedError,
    },

    #[error(
        "Unknown error while loading extension {reference}: {}",
        .detail.as_deref().unwrap_or("no details")
    )]
    Unknown {
        reference: String,
        detail: Option<String>,
    },
}

impl ExtensionError {
    /// Wrap a module loading failure for `reference`.
    pub fn load(reference: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Load {
            reference: reference.into(),
            cause: Arc::from(cause.into()),
        }
    }

    /// Wrap an entry point failure for `reference`.
    pub fn init(reference: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Init {
            reference: reference.into(),
            cause: Arc::from(cause.into()),
        }
    }

    pub fn unknown(reference: impl Into<String>, detail: Option<String>) -> Self {
        Self::Unknown {
            reference: reference.into(),
            detail,
        }
    }

    /// Reference of the extension the error is about, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::DuplicateExtension(reference) => Some(reference),
            Self::AlreadyInitialized | Self::NoRuntime(_) => None,
            Self::Load { reference, .. }
            | Self::Init { reference, .. }
            | Self::Unknown { reference, .. } => Some(reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_duplicate_extension_error() {
        let err = ExtensionError::DuplicateExtension("ext-one".to_string());
        let display = err.to_string();
        assert!(display.contains("already registered"));
        assert!(display.contains("ext-one"));
        assert!(display.contains("only be added once"));
    }

    #[test]
    fn test_already_initialized_error() {
        let err = ExtensionError::AlreadyInitialized;
        assert!(err.to_string().contains("already started"));
        assert!(err.reference().is_none());
    }

    #[test]
    fn test_no_runtime_error() {
        let err = ExtensionError::NoRuntime("not inside a tokio runtime".to_string());
        assert!(err.to_string().contains("No async runtime"));
        assert!(err.reference().is_none());
    }

    #[test]
    fn test_load_error_keeps_cause() {
        let err = ExtensionError::load("ext-one", "module not found");
        let display = err.to_string();
        assert!(display.contains("ext-one"));
        assert!(display.contains("module not found"));
        assert_eq!(err.reference(), Some("ext-one"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_init_error_from_typed_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = ExtensionError::init("storage", io);
        assert!(matches!(err, ExtensionError::Init { .. }));
        assert!(err.to_string().contains("disk full"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".to_string()));
    }

    #[test]
    fn test_unknown_error_without_detail() {
        let err = ExtensionError::unknown("ext", None);
        assert!(err.to_string().contains("Unknown error"));
        assert!(err.to_string().contains("no details"));
    }

    #[test]
    fn test_unknown_error_with_detail() {
        let err = ExtensionError::unknown("ext", Some("boom".to_string()));
        assert!(err.to_string().ends_with("boom"));
    }

    #[test]
    fn test_clone_shares_cause() {
        let err = ExtensionError::load("ext", "gone");
        let cloned = err.clone();
        match (err, cloned) {
            (ExtensionError::Load { cause: a, .. }, ExtensionError::Load { cause: b, .. }) => {
                assert!(Arc::ptr_eq(&a, &b));
            }
            _ => panic!("expected load errors"),
        }
    }
}
