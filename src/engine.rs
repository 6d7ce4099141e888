//! Resolution engine.
//!
//! [`DedupEngine`] is the facade the platform's HTTP layer talks to. It
//! holds a handle to the lead store and a validated matcher config, and
//! exposes the three resolution operations: full-table scan, merge, and
//! pre-insertion check. The engine itself is stateless between calls.

use std::sync::Arc;

use chrono::Utc;

use crate::config::MatcherConfig;
use crate::error::{DedupResult, ValidationError};
use crate::lead::{Lead, LeadDraft, LeadId};
use crate::matcher::{check_duplicate, DuplicateMatch};
use crate::merge::reconcile;
use crate::scanner::{scan_with, DeduplicationResult, ScanOptions};
use crate::storage::LeadStore;

/// The resolution engine: duplicate scanning, merging, and pre-insertion
/// checking over a pluggable lead store.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use leadmatch::{DedupEngine, InMemoryLeadStore, LeadDraft, LeadStore};
///
/// let store = Arc::new(InMemoryLeadStore::new());
/// store.insert(LeadDraft::new("Jefferson County", "AL")).unwrap();
/// store.insert(LeadDraft::new("Jefferson Co", "AL")).unwrap();
///
/// let engine = DedupEngine::new(store);
/// let report = engine.find_duplicates().unwrap();
/// assert_eq!(report.total_leads, 2);
/// ```
#[derive(Clone)]
pub struct DedupEngine {
    store: Arc<dyn LeadStore>,
    config: MatcherConfig,
}

impl DedupEngine {
    /// Create an engine with the default matcher thresholds.
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            store,
            config: MatcherConfig::default(),
        }
    }

    /// Create an engine with custom thresholds.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the config is out of range.
    pub fn with_config(
        store: Arc<dyn LeadStore>,
        config: MatcherConfig,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// The active matcher config.
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Scans the whole table for duplicates and groups the findings.
    ///
    /// One bulk read, then a CPU-bound quadratic pass over the snapshot; on
    /// large tables treat this as a batch job.
    ///
    /// # Errors
    /// Propagates store failures unmodified.
    pub fn find_duplicates(&self) -> DedupResult<DeduplicationResult> {
        self.find_duplicates_with(ScanOptions::default())
    }

    /// [`find_duplicates`](Self::find_duplicates) with explicit scan options
    /// (e.g. blocking for large tables).
    ///
    /// # Errors
    /// Propagates store failures unmodified.
    pub fn find_duplicates_with(&self, options: ScanOptions) -> DedupResult<DeduplicationResult> {
        let leads = self.store.all()?;
        Ok(scan_with(&leads, &self.config, options))
    }

    /// Merges `merge_id` into `keep_id` and retires the losing record.
    ///
    /// Returns `Ok(None)` when either id does not resolve; nothing is
    /// written in that case. The read/update/delete sequence is not wrapped
    /// in a transaction: callers must serialize concurrent merges touching
    /// the same leads.
    ///
    /// # Errors
    /// [`ValidationError::SameLead`] when `keep_id == merge_id` (callers are
    /// expected to reject this earlier); store failures propagate unmodified.
    pub fn merge_leads(&self, keep_id: LeadId, merge_id: LeadId) -> DedupResult<Option<Lead>> {
        if keep_id == merge_id {
            return Err(ValidationError::SameLead { id: keep_id }.into());
        }

        let Some(keep) = self.store.get(keep_id)? else {
            return Ok(None);
        };
        let Some(merge) = self.store.get(merge_id)? else {
            return Ok(None);
        };

        let merged = reconcile(&keep, &merge, Utc::now());
        let Some(persisted) = self.store.update(merged)? else {
            // The keep lead vanished between the read and the write.
            return Ok(None);
        };

        if !self.store.delete(merge_id)? {
            tracing::warn!(%merge_id, "merge-losing lead already deleted");
        }

        tracing::info!(
            keep = %keep_id,
            merged = %merge_id,
            "merged lead records"
        );
        Ok(Some(persisted))
    }

    /// Checks a not-yet-persisted candidate against every stored lead.
    ///
    /// Returns matches sorted descending by similarity; an empty vec means
    /// the candidate looks unique. Never mutates the store.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a draft missing its required
    /// fields; store failures propagate unmodified.
    pub fn check_new_lead(&self, draft: &LeadDraft) -> DedupResult<Vec<DuplicateMatch>> {
        draft.validate()?;
        let candidate = draft.to_candidate();

        let leads = self.store.all()?;
        let mut matches: Vec<DuplicateMatch> = leads
            .iter()
            .filter_map(|existing| check_duplicate(&candidate, existing, &self.config))
            .collect();
        matches.sort_by(|a, b| b.similarity.cmp(&a.similarity));

        tracing::debug!(
            candidates_checked = leads.len(),
            matches = matches.len(),
            "pre-insertion duplicate check complete"
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryLeadStore;

    fn engine_with(drafts: Vec<LeadDraft>) -> (DedupEngine, Arc<InMemoryLeadStore>) {
        let store = Arc::new(InMemoryLeadStore::new());
        for draft in drafts {
            store.insert(draft).unwrap();
        }
        (DedupEngine::new(store.clone()), store)
    }

    #[test]
    fn merge_same_id_is_validation_error() {
        let (engine, _) = engine_with(vec![LeadDraft::new("Jefferson County", "AL")]);
        let err = engine.merge_leads(LeadId::new(1), LeadId::new(1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn merge_missing_id_is_none_without_writes() {
        let (engine, store) = engine_with(vec![LeadDraft::new("Jefferson County", "AL")]);
        let before = store.get(LeadId::new(1)).unwrap().unwrap();

        let outcome = engine.merge_leads(LeadId::new(1), LeadId::new(99)).unwrap();
        assert!(outcome.is_none());

        let after = store.get(LeadId::new(1)).unwrap().unwrap();
        assert_eq!(after.updated_at, before.updated_at);
        assert!(after.notes.is_none());
    }

    #[test]
    fn check_new_lead_rejects_blank_draft() {
        let (engine, _) = engine_with(vec![]);
        let err = engine.check_new_lead(&LeadDraft::new("", "AL")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn with_config_validates() {
        let store = Arc::new(InMemoryLeadStore::new());
        let bad = MatcherConfig {
            min_average: 180,
            ..MatcherConfig::default()
        };
        assert!(DedupEngine::with_config(store, bad).is_err());
    }
}
