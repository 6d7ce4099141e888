//! Abstract storage trait for lead records.
//!
//! The trait defines the contract the resolution engine needs from the
//! persistence layer. By using a trait, we enable:
//! - An in-memory backend for testing and embedded use
//! - A relational backend in the full platform
//!
//! The engine performs no retries: any error a backend raises during a scan,
//! merge, or check operation is propagated to the caller unmodified.

use thiserror::Error;

use crate::lead::{Lead, LeadDraft, LeadId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Lead not found.
    #[error("Lead not found: {0}")]
    LeadNotFound(LeadId),

    /// Key already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage trait for lead records.
///
/// # Consistency
/// Implementations must be internally consistent per call, but the engine's
/// merge path issues several calls in sequence with no transaction around
/// them; callers that need atomicity must serialize merges against the same
/// leads or provide it in the backend.
pub trait LeadStore: Send + Sync {
    /// Insert a new lead, assigning its id. Returns the persisted record.
    fn insert(&self, draft: LeadDraft) -> Result<Lead, StorageError>;

    /// Full table scan, in insertion order.
    fn all(&self) -> Result<Vec<Lead>, StorageError>;

    /// Get a lead by id. `Ok(None)` when absent.
    fn get(&self, id: LeadId) -> Result<Option<Lead>, StorageError>;

    /// Replace an existing lead, refreshing its modification timestamp.
    /// Returns the persisted record, or `Ok(None)` when the id is unknown.
    fn update(&self, lead: Lead) -> Result<Option<Lead>, StorageError>;

    /// Delete a lead by id. Returns whether a record was removed.
    fn delete(&self, id: LeadId) -> Result<bool, StorageError>;
}
