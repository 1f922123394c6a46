//! Index Manager
//!
//! Maintains one `IndexTree` per secondary index a model declares.
//!
//! # API
//!
//! - `apply_write(id, old, new)` - Update indexes after a record is stored
//! - `apply_delete(id, record)` - Update indexes after a record is removed
//! - `lookup_eq(field, value)` - Exact match lookup

use std::collections::BTreeMap;

use serde_json::Value;

use super::btree::IndexTree;
use super::errors::{IndexError, IndexResult};
use crate::schema::ModelDef;

/// Secondary indexes of a single model
#[derive(Debug, Clone)]
pub struct IndexManager {
    model: String,
    /// Indexed field -> tree
    indexes: BTreeMap<String, IndexTree>,
}

impl IndexManager {
    /// Creates empty indexes for every secondary index `model` declares
    pub fn for_model(model: &ModelDef) -> Self {
        let indexes = model
            .indexed_fields()
            .map(|field| (field.to_string(), IndexTree::new()))
            .collect();

        Self {
            model: model.name.clone(),
            indexes,
        }
    }

    /// Apply a write (insert or update).
    ///
    /// Called AFTER the record is stored. `old` is the previous version for
    /// updates; its entries are removed before the new ones are added.
    pub fn apply_write(&mut self, id: &str, old: Option<&Value>, new: &Value) {
        if let Some(old) = old {
            self.unindex(id, old);
        }

        for (field, tree) in self.indexes.iter_mut() {
            if let Some(key) = new.get(field).and_then(Value::as_str) {
                tree.insert(key, id);
            }
        }
    }

    /// Apply a delete. Removes the record from all indexes.
    pub fn apply_delete(&mut self, id: &str, record: &Value) {
        self.unindex(id, record);
    }

    fn unindex(&mut self, id: &str, record: &Value) {
        for (field, tree) in self.indexes.iter_mut() {
            if let Some(key) = record.get(field).and_then(Value::as_str) {
                tree.remove(key, id);
            }
        }
    }

    /// Ids whose `field` equals `value`, sorted ascending.
    pub fn lookup_eq(&self, field: &str, value: &str) -> IndexResult<Vec<String>> {
        let tree = self
            .indexes
            .get(field)
            .ok_or_else(|| IndexError::not_indexed(&self.model, field))?;

        Ok(tree.lookup_eq(value))
    }
}
