//! Selected product set with a durable mirror
//!
//! The selection is an ordered list of unique product ids. Every mutation is
//! written through to the key-value store under a single fixed key, and the
//! list is read back once at startup.

pub mod storage;

use std::sync::Arc;

use crate::catalog::{Product, ProductId};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Default storage key for the selected id list
pub const SELECTION_KEY: &str = "selectedProductIds";

pub struct SelectionStore {
    ids: Vec<ProductId>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl SelectionStore {
    /// Rehydrate from storage
    ///
    /// Absent, unparsable or non-array values give an empty selection.
    pub fn restore(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let ids = match storage.get(&key) {
            Some(saved) => match serde_json::from_str::<Vec<ProductId>>(&saved) {
                Ok(saved_ids) => {
                    let mut ids: Vec<ProductId> = Vec::with_capacity(saved_ids.len());
                    for id in saved_ids {
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                    ids
                }
                Err(e) => {
                    tracing::debug!("Discarding saved selection under {}: {}", key, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        tracing::debug!("Restored {} selected product(s)", ids.len());
        Self { ids, storage, key }
    }

    /// Remove `id` if present, otherwise append it. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        let selected = match self.ids.iter().position(|p| *p == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        };
        self.persist();
        selected
    }

    /// Idempotent delete. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|p| p != id);
        self.persist();
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    /// Write the id list under the fixed key. Failures are logged only.
    pub fn persist(&self) {
        let result = serde_json::to_string(&self.ids)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(&self.key, &json));

        if let Err(e) = result {
            tracing::warn!("Failed to persist selection: {}", e);
        }
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected products present in `catalog`, in catalog order
    ///
    /// Ids missing from the catalog are skipped but stay selected.
    pub fn resolve<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|p| self.contains(&p.id)).collect()
    }
}
