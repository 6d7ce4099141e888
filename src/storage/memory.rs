//! In-memory storage backend.
//!
//! Thread-safe reference implementation of [`LeadStore`]. Intended for
//! embedded usage and tests; the full platform talks to a relational store
//! through the same trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::lead::{Lead, LeadDraft, LeadId};
use crate::storage::traits::{LeadStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::Backend(format!("poisoned lock: {context}"))
}

#[derive(Debug)]
struct StoreState {
    by_id: BTreeMap<LeadId, Lead>,
    next_id: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// Thread-safe in-memory lead store.
///
/// Ids are assigned sequentially starting at 1 and never reused, so the
/// ascending-id iteration of [`LeadStore::all`] matches insertion order.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    state: RwLock<StoreState>,
}

impl InMemoryLeadStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leads currently stored.
    ///
    /// # Errors
    /// Returns a backend error if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("lead.len"))?;
        Ok(state.by_id.len())
    }

    /// Returns true if the store holds no leads.
    ///
    /// # Errors
    /// Returns a backend error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl LeadStore for InMemoryLeadStore {
    fn insert(&self, draft: LeadDraft) -> Result<Lead, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("lead.insert"))?;
        let id = LeadId::new(state.next_id);
        state.next_id += 1;

        let lead = Lead::from_draft(id, draft);
        state.by_id.insert(id, lead.clone());
        Ok(lead)
    }

    fn all(&self) -> Result<Vec<Lead>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("lead.all"))?;
        Ok(state.by_id.values().cloned().collect())
    }

    fn get(&self, id: LeadId) -> Result<Option<Lead>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("lead.get"))?;
        Ok(state.by_id.get(&id).cloned())
    }

    fn update(&self, mut lead: Lead) -> Result<Option<Lead>, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("lead.update"))?;
        if !state.by_id.contains_key(&lead.id) {
            return Ok(None);
        }
        lead.touch();
        state.by_id.insert(lead.id, lead.clone());
        Ok(Some(lead))
    }

    fn delete(&self, id: LeadId) -> Result<bool, StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("lead.delete"))?;
        Ok(state.by_id.remove(&id).is_some())
    }
}
