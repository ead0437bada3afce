//! Module loader errors.

use std::sync::Arc;

use thiserror::Error;

use super::{BoxError, SharedError};

#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    #[error("Module not found: {name} (location: {location})")]
    NotFound { name: String, location: String },

    #[error("Module path conflict for {name}: already mapped to {existing}, refusing {requested}")]
    PathConflict {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("Module {location} failed to load: {cause}")]
    Failed {
        location: String,
        #[source]
        cause: SharedError,
    },
}

impl LoaderError {
    pub fn not_found(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn failed(location: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Failed {
            location: location.into(),
            cause: Arc::from(cause.into()),
        }
    }
}
