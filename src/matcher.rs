//! Pairwise duplicate detection.
//!
//! [`check_duplicate`] is the heart of the resolution engine: given two
//! leads it either produces a [`DuplicateMatch`] with an aggregate score,
//! human-readable reasons, and a suggested action, or `None` when the pair
//! is not a credible duplicate. `None` is normal control flow, not an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::lead::{Lead, LeadId};
use crate::normalize::{email_domain, phone_digits, website_host};
use crate::similarity::similarity;

/// What a reviewer should do with a detected duplicate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// High confidence: merge the records.
    Merge,
    /// Probable duplicate: route to a human reviewer.
    Review,
    /// Low-band match: keep both records, flag for awareness.
    KeepBoth,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Review => write!(f, "review"),
            Self::KeepBoth => write!(f, "keep_both"),
        }
    }
}

/// A scored comparison between two leads. Transient: computed on demand,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// First lead of the pair (the candidate, in pre-insertion checks).
    pub lead_a: LeadId,

    /// Second lead of the pair.
    pub lead_b: LeadId,

    /// Aggregate similarity, 0-100.
    pub similarity: u8,

    /// Human-readable match reasons, in signal evaluation order.
    pub reasons: Vec<String>,

    /// Suggested action for this score band.
    pub action: SuggestedAction,
}

/// Compares two leads and returns a match verdict, or `None` for a
/// non-duplicate pair.
///
/// Leads in different states never match, whatever the name similarity:
/// jurisdiction is part of a government department's identity. Given the
/// same state, available signals accumulate into a weighted average:
///
/// | signal        | counts when                            | weight |
/// |---------------|----------------------------------------|--------|
/// | name          | similarity >= `name_threshold`         | 2      |
/// | state         | always (gate already passed)           | 1      |
/// | county        | both set, similarity >= `field_threshold` | 1   |
/// | department    | both set, similarity >= `field_threshold` | 1   |
/// | email domain  | both set, domains equal                | 1      |
/// | phone         | both set, digits equal, long enough    | 1      |
/// | website       | both set, hosts equal                  | 1      |
///
/// The pair is rejected when the weighted average lands below
/// `min_average` or fewer than `min_reasons` signals fired. With the
/// default thresholds the name signal is effectively mandatory: same-state
/// alone is one reason, and every other signal requires data on both sides.
#[must_use]
pub fn check_duplicate(a: &Lead, b: &Lead, config: &MatcherConfig) -> Option<DuplicateMatch> {
    if a.state != b.state {
        return None;
    }

    let mut total: u32 = 0;
    let mut factors: u32 = 0;
    let mut reasons: Vec<String> = Vec::new();

    let name_sim = similarity(&a.institution_name, &b.institution_name);
    if name_sim >= config.name_threshold {
        total += u32::from(name_sim) * 2;
        factors += 2;
        reasons.push(format!("Institution name {name_sim}% similar"));
    }

    total += 100;
    factors += 1;
    reasons.push("Same state".to_string());

    if let (Some(x), Some(y)) = (a.county.as_deref(), b.county.as_deref()) {
        let sim = similarity(x, y);
        if sim >= config.field_threshold {
            total += u32::from(sim);
            factors += 1;
            reasons.push(format!("County {sim}% similar"));
        }
    }

    if let (Some(x), Some(y)) = (a.department.as_deref(), b.department.as_deref()) {
        let sim = similarity(x, y);
        if sim >= config.field_threshold {
            total += u32::from(sim);
            factors += 1;
            reasons.push(format!("Department {sim}% similar"));
        }
    }

    if let (Some(x), Some(y)) = (a.email.as_deref(), b.email.as_deref()) {
        if let (Some(da), Some(db)) = (email_domain(x), email_domain(y)) {
            if da == db {
                total += 100;
                factors += 1;
                reasons.push("Same email domain".to_string());
            }
        }
    }

    if let (Some(x), Some(y)) = (a.phone.as_deref(), b.phone.as_deref()) {
        let dx = phone_digits(x);
        let dy = phone_digits(y);
        if dx.len() >= config.min_phone_digits && dx == dy {
            total += 100;
            factors += 1;
            reasons.push("Same phone number".to_string());
        }
    }

    if let (Some(x), Some(y)) = (a.website.as_deref(), b.website.as_deref()) {
        let hx = website_host(x);
        let hy = website_host(y);
        if !hx.is_empty() && hx == hy {
            total += 100;
            factors += 1;
            reasons.push("Same website".to_string());
        }
    }

    // factors >= 1: the state signal always fires.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let avg = (f64::from(total) / f64::from(factors)).round() as u8;

    if avg < config.min_average || reasons.len() < config.min_reasons {
        return None;
    }

    let action = if avg >= config.merge_threshold {
        SuggestedAction::Merge
    } else if avg >= config.review_threshold {
        SuggestedAction::Review
    } else {
        SuggestedAction::KeepBoth
    };

    tracing::trace!(
        lead_a = %a.id,
        lead_b = %b.id,
        similarity = avg,
        action = %action,
        "duplicate pair detected"
    );

    Some(DuplicateMatch {
        lead_a: a.id,
        lead_b: b.id,
        similarity: avg,
        reasons,
        action,
    })
}
