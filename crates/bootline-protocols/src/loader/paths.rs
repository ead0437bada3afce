//! Host-owned module location table.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::LoaderError;

/// How a merge treats a name that is already mapped elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// The incoming location replaces the existing one.
    #[default]
    LastWriteWins,
    /// The merge fails and the table is left untouched.
    RejectOverlap,
}

/// Name to location table shared by the host, its module loader and the
/// resolver.
///
/// Extensions merge their dependency tables into it; entries are never
/// removed. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct ModulePaths {
    table: Arc<RwLock<BTreeMap<String, String>>>,
    policy: ConflictPolicy,
}

impl ModulePaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self {
            table: Arc::default(),
            policy,
        }
    }

    /// Table seeded from host configuration.
    pub fn from_table(table: BTreeMap<String, String>, policy: ConflictPolicy) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
            policy,
        }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.table.read().get(name).cloned()
    }

    /// Location for `name`, or the name itself when it is not mapped.
    pub fn resolve(&self, name: &str) -> String {
        self.get(name).unwrap_or_else(|| name.to_string())
    }

    /// Merge `paths` into the table.
    ///
    /// Returns the names whose location changed. Re-declaring a name with the
    /// location it already has is never a conflict.
    pub fn merge(&self, paths: &BTreeMap<String, String>) -> Result<Vec<String>, LoaderError> {
        let mut table = self.table.write();

        let overridden: Vec<(&String, &String, String)> = paths
            .iter()
            .filter_map(|(name, location)| match table.get(name) {
                Some(existing) if existing != location => {
                    Some((name, location, existing.clone()))
                }
                _ => None,
            })
            .collect();

        if self.policy == ConflictPolicy::RejectOverlap {
            if let Some((name, location, existing)) = overridden.first() {
                return Err(LoaderError::PathConflict {
                    name: (*name).clone(),
                    existing: existing.clone(),
                    requested: (*location).clone(),
                });
            }
        }

        let changed = overridden.iter().map(|(name, _, _)| (*name).clone()).collect();
        for (name, location) in paths {
            table.insert(name.clone(), location.clone());
        }
        Ok(changed)
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.table.read().clone()
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_falls_back_to_name() {
        let paths = ModulePaths::new();
        assert!(paths.is_empty());
        assert_eq!(paths.resolve("ext-one"), "ext-one");
    }

    #[test]
    fn test_merge_adds_entries() {
        let paths = ModulePaths::new();
        let changed = paths.merge(&table(&[("lib", "vendor/lib")])).unwrap();
        assert!(changed.is_empty());
        assert_eq!(paths.resolve("lib"), "vendor/lib");
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let paths = ModulePaths::from_table(table(&[("lib", "a/lib")]), ConflictPolicy::LastWriteWins);
        let changed = paths.merge(&table(&[("lib", "b/lib"), ("other", "x")])).unwrap();
        assert_eq!(changed, vec!["lib".to_string()]);
        assert_eq!(paths.resolve("lib"), "b/lib");
        assert_eq!(paths.resolve("other"), "x");
    }

    #[test]
    fn test_reject_overlap_leaves_table_untouched() {
        let paths = ModulePaths::from_table(table(&[("lib", "a/lib")]), ConflictPolicy::RejectOverlap);
        let err = paths
            .merge(&table(&[("fresh", "f"), ("lib", "b/lib")]))
            .unwrap_err();
        assert!(matches!(err, LoaderError::PathConflict { ref name, .. } if name == "lib"));
        assert_eq!(paths.resolve("lib"), "a/lib");
        assert!(paths.get("fresh").is_none());
    }

    #[test]
    fn test_same_location_is_not_a_conflict() {
        let paths = ModulePaths::from_table(table(&[("lib", "a/lib")]), ConflictPolicy::RejectOverlap);
        let changed = paths.merge(&table(&[("lib", "a/lib")])).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn test_clones_share_table() {
        let paths = ModulePaths::new();
        let other = paths.clone();
        other.merge(&table(&[("lib", "vendor/lib")])).unwrap();
        assert_eq!(paths.get("lib").as_deref(), Some("vendor/lib"));
        assert_eq!(paths.snapshot(), other.snapshot());
    }

    #[test]
    fn test_policy_deserialize() {
        let policy: ConflictPolicy = serde_json::from_str("\"reject_overlap\"").unwrap();
        assert_eq!(policy, ConflictPolicy::RejectOverlap);
        assert_eq!(ConflictPolicy::default(), ConflictPolicy::LastWriteWins);
    }
}
