//! Lead records and identity.
//!
//! A [`Lead`] is a contact record for a government institution or department.
//! Leads are created by scraping or manual entry, mutated by enrichment and
//! merge operations, and destroyed only when they lose a merge. Stable ids
//! are assigned by the store; the resolution engine never invents them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Store-assigned numeric lead identifier.
///
/// Identifiers are unique within a store and never reused. The reserved
/// value [`LeadId::CANDIDATE`] marks a transient, not-yet-persisted record
/// used by the pre-insertion checker.
///
/// # Examples
///
/// ```
/// use leadmatch::LeadId;
///
/// let id = LeadId::new(42);
/// assert_eq!(id.get(), 42);
/// assert!(!id.is_candidate());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(i64);

impl LeadId {
    /// Sentinel id for a candidate record that has not been persisted yet.
    pub const CANDIDATE: Self = Self(-1);

    /// Creates a lead id from a raw store identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying numeric identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true if this is the candidate sentinel.
    #[must_use]
    pub const fn is_candidate(self) -> bool {
        self.0 == Self::CANDIDATE.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for LeadId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<LeadId> for i64 {
    fn from(id: LeadId) -> Self {
        id.0
    }
}

/// How a lead entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadOrigin {
    /// Harvested by an automated scraper.
    Scraped,
    /// Entered by a sales rep.
    Manual,
    /// Bulk-loaded from an external list.
    Import,
}

impl Default for LeadOrigin {
    fn default() -> Self {
        Self::Manual
    }
}

impl fmt::Display for LeadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scraped => write!(f, "scraped"),
            Self::Manual => write!(f, "manual"),
            Self::Import => write!(f, "import"),
        }
    }
}

/// A named contact at the institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMaker {
    /// Full name, used as the identity key when merging.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl DecisionMaker {
    /// Creates a contact with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            email: None,
            phone: None,
        }
    }
}

/// A news mention attached to a lead during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Canonical article URL, used as the identity key when merging.
    pub url: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A government institution/department contact record.
///
/// The enrichment collections (`pain_points`, `tech_stack`, `buying_signals`,
/// `decision_makers`, `recent_news`) are filled in by out-of-band enrichment
/// jobs; the merge resolver guarantees their union survives a merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Store-assigned identifier.
    pub id: LeadId,

    pub institution_name: String,

    /// Two-letter state code. Required: leads in different states are never
    /// considered duplicates of each other.
    pub state: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_budget: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_maturity_score: Option<u8>,

    #[serde(default)]
    pub pain_points: Vec<String>,

    #[serde(default)]
    pub tech_stack: Vec<String>,

    #[serde(default)]
    pub buying_signals: Vec<String>,

    #[serde(default)]
    pub decision_makers: Vec<DecisionMaker>,

    #[serde(default)]
    pub recent_news: Vec<NewsItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub origin: LeadOrigin,

    /// Loose bag for enrichment payloads that have no dedicated column.
    #[serde(default)]
    pub metadata: serde_json::Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Creates a bare lead with a known id.
    ///
    /// Intended for tests and data migration; production records are created
    /// through [`LeadStore::insert`](crate::storage::LeadStore::insert),
    /// which assigns the id.
    #[must_use]
    pub fn with_id(id: LeadId, name: impl Into<String>, state: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            institution_name: name.into(),
            state: state.into(),
            county: None,
            department: None,
            city: None,
            email: None,
            phone: None,
            website: None,
            population: None,
            annual_budget: None,
            tech_maturity_score: None,
            pain_points: Vec::new(),
            tech_stack: Vec::new(),
            buying_signals: Vec::new(),
            decision_makers: Vec::new(),
            recent_news: Vec::new(),
            notes: None,
            origin: LeadOrigin::default(),
            metadata: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    /// Materializes a draft into a lead owned by the store.
    #[must_use]
    pub fn from_draft(id: LeadId, draft: LeadDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            institution_name: draft.institution_name,
            state: draft.state,
            county: draft.county,
            department: draft.department,
            city: draft.city,
            email: draft.email,
            phone: draft.phone,
            website: draft.website,
            population: draft.population,
            annual_budget: draft.annual_budget,
            tech_maturity_score: draft.tech_maturity_score,
            pain_points: draft.pain_points,
            tech_stack: draft.tech_stack,
            buying_signals: draft.buying_signals,
            decision_makers: draft.decision_makers,
            recent_news: draft.recent_news,
            notes: draft.notes,
            origin: draft.origin,
            metadata: draft.metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl PartialEq for Lead {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Lead {}

impl std::hash::Hash for Lead {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Candidate fields for a lead that has not been persisted yet.
///
/// Used both as the insert payload for [`LeadStore::insert`] and as the input
/// to the pre-insertion duplicate checker. Only `institution_name` and
/// `state` are required.
///
/// [`LeadStore::insert`]: crate::storage::LeadStore::insert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadDraft {
    pub institution_name: String,
    pub state: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_budget: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_maturity_score: Option<u8>,

    #[serde(default)]
    pub pain_points: Vec<String>,

    #[serde(default)]
    pub tech_stack: Vec<String>,

    #[serde(default)]
    pub buying_signals: Vec<String>,

    #[serde(default)]
    pub decision_makers: Vec<DecisionMaker>,

    #[serde(default)]
    pub recent_news: Vec<NewsItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub origin: LeadOrigin,

    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl LeadDraft {
    /// Creates a draft with the two required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            institution_name: name.into(),
            state: state.into(),
            ..Self::default()
        }
    }

    /// Checks that the required fields are present.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyInstitutionName`] or
    /// [`ValidationError::EmptyState`] when a required field is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.institution_name.trim().is_empty() {
            return Err(ValidationError::EmptyInstitutionName);
        }
        if self.state.trim().is_empty() {
            return Err(ValidationError::EmptyState);
        }
        Ok(())
    }

    /// Builds the transient candidate record the pre-insertion checker
    /// compares against the store.
    #[must_use]
    pub fn to_candidate(&self) -> Lead {
        Lead::from_draft(LeadId::CANDIDATE, self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_id_roundtrip() {
        let id = LeadId::new(7);
        assert_eq!(i64::from(id), 7);
        assert_eq!(LeadId::from(7), id);
        assert_eq!(format!("{id}"), "7");
    }

    #[test]
    fn test_candidate_sentinel() {
        assert!(LeadId::CANDIDATE.is_candidate());
        assert!(!LeadId::new(0).is_candidate());
    }

    #[test]
    fn test_lead_equality_is_by_id() {
        let a = Lead::with_id(LeadId::new(1), "Jefferson County", "AL");
        let mut b = Lead::with_id(LeadId::new(1), "Different Name", "GA");
        b.population = Some(10_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_draft_validation() {
        assert!(LeadDraft::new("Jefferson County", "AL").validate().is_ok());
        assert!(matches!(
            LeadDraft::new("  ", "AL").validate(),
            Err(ValidationError::EmptyInstitutionName)
        ));
        assert!(matches!(
            LeadDraft::new("Jefferson County", "").validate(),
            Err(ValidationError::EmptyState)
        ));
    }

    #[test]
    fn test_draft_to_candidate() {
        let mut draft = LeadDraft::new("Jefferson County", "AL");
        draft.county = Some("Jefferson".to_string());
        let candidate = draft.to_candidate();
        assert!(candidate.id.is_candidate());
        assert_eq!(candidate.institution_name, "Jefferson County");
        assert_eq!(candidate.county.as_deref(), Some("Jefferson"));
    }

    #[test]
    fn test_lead_serialization() {
        let mut lead = Lead::with_id(LeadId::new(3), "Shelby County", "AL");
        lead.pain_points.push("legacy systems".to_string());
        let json = serde_json::to_string(&lead).unwrap();
        let back: Lead = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, lead.id);
        assert_eq!(back.pain_points, lead.pain_points);
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(format!("{}", LeadOrigin::Scraped), "scraped");
        assert_eq!(LeadOrigin::default(), LeadOrigin::Manual);
    }
}
