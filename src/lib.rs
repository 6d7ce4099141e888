//! # leadmatch - entity resolution for a government-sector lead database
//!
//! leadmatch decides whether two independently created lead records describe
//! the same real-world government institution, scores how confident that
//! decision is, and merges confirmed duplicates without losing enrichment
//! data.
//!
//! ## Core concepts
//!
//! - **Lead**: a contact record for a government institution or department
//! - **DuplicateMatch**: a scored pairwise verdict with human-readable reasons
//! - **DeduplicationResult**: one scan's worth of duplicate groups
//! - **DedupEngine**: the facade tying the matcher to a pluggable lead store
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use leadmatch::{DedupEngine, InMemoryLeadStore, LeadDraft, LeadStore};
//!
//! let store = Arc::new(InMemoryLeadStore::new());
//! let keep = store.insert(LeadDraft::new("Jefferson County", "AL")).unwrap();
//! let dupe = store.insert(LeadDraft::new("Jefferson Co", "AL")).unwrap();
//!
//! let engine = DedupEngine::new(store);
//! let report = engine.find_duplicates().unwrap();
//! assert_eq!(report.groups.len(), 1);
//!
//! let merged = engine.merge_leads(keep.id, dupe.id).unwrap().unwrap();
//! assert_eq!(merged.id, keep.id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod lead;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod scanner;
pub mod similarity;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use config::MatcherConfig;
pub use engine::DedupEngine;
pub use error::{DedupError, DedupResult, ValidationError};
pub use lead::{DecisionMaker, Lead, LeadDraft, LeadId, LeadOrigin, NewsItem};
pub use matcher::{check_duplicate, DuplicateMatch, SuggestedAction};
pub use merge::reconcile;
pub use normalize::{email_domain, normalize, normalize_opt, phone_digits, website_host};
pub use scanner::{
    scan, scan_with, Blocking, DeduplicationResult, DuplicateGroup, GroupEntry, ScanOptions,
};
pub use similarity::similarity;
pub use storage::{InMemoryLeadStore, LeadStore, StorageError};
