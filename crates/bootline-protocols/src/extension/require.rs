//! Dependency location tables declared by extensions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Dependencies an extension needs loaded before it initializes.
///
/// `paths` maps a module name to its location. The table is merged into the
/// host's [`ModulePaths`](crate::loader::ModulePaths) and every declared name
/// is requested from the module loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireConfig {
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

impl RequireConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, name: impl Into<String>, location: impl Into<String>) -> Self {
        self.paths.insert(name.into(), location.into());
        self
    }

    /// Names to request once the table is merged.
    pub fn dependency_names(&self) -> Vec<String> {
        self.paths.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_require_config() {
        let require = RequireConfig::new();
        assert!(require.is_empty());
        assert!(require.dependency_names().is_empty());
    }

    #[test]
    fn test_dependency_names_follow_table() {
        let require = RequireConfig::new()
            .with_path("widgets", "vendor/widgets")
            .with_path("charts", "vendor/charts");
        assert_eq!(require.dependency_names(), vec!["charts", "widgets"]);
    }

    #[test]
    fn test_deserialize_from_json() {
        let require: RequireConfig =
            serde_json::from_str(r#"{"paths": {"lib": "vendor/lib"}}"#).unwrap();
        assert_eq!(require.paths.get("lib").map(String::as_str), Some("vendor/lib"));

        let empty: RequireConfig = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
