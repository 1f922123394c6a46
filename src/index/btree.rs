//! BTreeMap-based index structure
//!
//! Maps an attribute value to the set of record ids carrying it.
//! Both levels are ordered, so lookups are deterministic and ids come back
//! sorted ascending.

use std::collections::{BTreeMap, BTreeSet};

/// A single attribute index.
#[derive(Debug, Default, Clone)]
pub struct IndexTree {
    tree: BTreeMap<String, BTreeSet<String>>,
}

impl IndexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record id under a key. Inserting twice is a no-op.
    pub fn insert(&mut self, key: &str, id: &str) {
        self.tree
            .entry(key.to_string())
            .or_default()
            .insert(id.to_string());
    }

    /// Remove a record id from a key.
    ///
    /// If the key has no more ids, removes the key entirely.
    pub fn remove(&mut self, key: &str, id: &str) {
        if let Some(ids) = self.tree.get_mut(key) {
            ids.remove(id);
            if ids.is_empty() {
                self.tree.remove(key);
            }
        }
    }

    /// All ids for an exact key match, sorted ascending.
    pub fn lookup_eq(&self, key: &str) -> Vec<String> {
        self.tree
            .get(key)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}
