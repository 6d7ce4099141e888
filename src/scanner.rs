//! Full-table duplicate scanning and grouping.
//!
//! The scanner runs the pairwise matcher over every unordered pair of leads
//! and groups the hits by their lower id. The scan is CPU-bound on a single
//! in-memory snapshot: a 5,000-row table means ~12.5 million comparisons,
//! so large tables should opt into [`Blocking::StatePrefix`] or run the scan
//! as a batch job.
//!
//! Grouping is deliberately not transitively closed: if A matches B and B
//! matches C but A does not match C, the result holds a group anchored at A
//! containing B, and a second group anchored at B containing C. A lead
//! joins at most one group as a duplicate, but may still anchor its own.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::lead::{Lead, LeadId};
use crate::matcher::check_duplicate;
use crate::normalize::normalize;

/// One duplicate recorded under a group's primary lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEntry {
    /// The duplicate lead.
    pub id: LeadId,

    /// Its institution name at scan time.
    pub name: String,

    /// Aggregate similarity against the primary, 0-100.
    pub similarity: u8,

    /// Match reasons, in signal evaluation order.
    pub reasons: Vec<String>,
}

/// A primary lead and the leads judged duplicates of it.
///
/// The primary is always the lower id of any pair that seeded the group; it
/// is also the record that survives if the group is merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub primary: LeadId,

    pub primary_name: String,

    pub duplicates: Vec<GroupEntry>,
}

impl DuplicateGroup {
    /// Number of duplicates recorded under this primary.
    #[must_use]
    pub fn size(&self) -> usize {
        self.duplicates.len()
    }
}

/// Scan-wide output: every duplicate group found in one pass over the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduplicationResult {
    /// Number of leads scanned.
    pub total_leads: usize,

    /// Sum of duplicates across all groups.
    pub duplicates_found: usize,

    /// Groups sorted descending by duplicate count.
    pub groups: Vec<DuplicateGroup>,

    pub generated_at: DateTime<Utc>,
}

/// Candidate-pair generation strategy for the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Blocking {
    /// Compare every same-table pair. Exhaustive and quadratic; the default.
    None,

    /// Only compare leads sharing a state and the first `prefix_len`
    /// characters of their normalized institution name. An approximation:
    /// pairs whose normalized names diverge inside the prefix are skipped
    /// without ever reaching the matcher.
    StatePrefix {
        prefix_len: usize,
    },
}

/// Options for [`scan_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanOptions {
    #[serde(default)]
    pub blocking: Blocking,
}

impl Default for Blocking {
    fn default() -> Self {
        Self::None
    }
}

/// Runs the full pairwise scan with default options.
#[must_use]
pub fn scan(leads: &[Lead], config: &MatcherConfig) -> DeduplicationResult {
    scan_with(leads, config, ScanOptions::default())
}

/// Runs the pairwise scan with explicit options.
///
/// Deterministic for a fixed lead list and config: pairs are visited in
/// list order, each unordered pair exactly once, and a lead is never
/// compared with itself.
#[must_use]
pub fn scan_with(leads: &[Lead], config: &MatcherConfig, options: ScanOptions) -> DeduplicationResult {
    tracing::debug!(
        total_leads = leads.len(),
        blocking = ?options.blocking,
        "starting duplicate scan"
    );

    let mut groups: BTreeMap<LeadId, DuplicateGroup> = BTreeMap::new();
    let mut visited: HashSet<(LeadId, LeadId)> = HashSet::new();
    // Leads already recorded as a duplicate; each joins at most one group.
    let mut assigned: HashSet<LeadId> = HashSet::new();

    match options.blocking {
        Blocking::None => {
            for (i, a) in leads.iter().enumerate() {
                for b in &leads[i + 1..] {
                    consider_pair(a, b, config, &mut groups, &mut visited, &mut assigned);
                }
            }
        }
        Blocking::StatePrefix { prefix_len } => {
            let mut buckets: HashMap<(String, String), Vec<&Lead>> = HashMap::new();
            for lead in leads {
                let prefix: String = normalize(&lead.institution_name)
                    .chars()
                    .take(prefix_len)
                    .collect();
                buckets
                    .entry((lead.state.clone(), prefix))
                    .or_default()
                    .push(lead);
            }
            for bucket in buckets.values() {
                for (i, a) in bucket.iter().enumerate() {
                    for b in &bucket[i + 1..] {
                        consider_pair(a, b, config, &mut groups, &mut visited, &mut assigned);
                    }
                }
            }
        }
    }

    let mut groups: Vec<DuplicateGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| b.size().cmp(&a.size()));

    let duplicates_found = groups.iter().map(DuplicateGroup::size).sum();

    tracing::debug!(
        groups = groups.len(),
        duplicates_found,
        "duplicate scan complete"
    );

    DeduplicationResult {
        total_leads: leads.len(),
        duplicates_found,
        groups,
        generated_at: Utc::now(),
    }
}

fn consider_pair(
    a: &Lead,
    b: &Lead,
    config: &MatcherConfig,
    groups: &mut BTreeMap<LeadId, DuplicateGroup>,
    visited: &mut HashSet<(LeadId, LeadId)>,
    assigned: &mut HashSet<LeadId>,
) {
    if a.id == b.id {
        return;
    }
    let key = (a.id.min(b.id), a.id.max(b.id));
    if !visited.insert(key) {
        return;
    }

    let Some(found) = check_duplicate(a, b, config) else {
        return;
    };

    let (primary, duplicate) = if a.id <= b.id { (a, b) } else { (b, a) };
    if assigned.contains(&duplicate.id) {
        return;
    }
    assigned.insert(duplicate.id);

    let group = groups.entry(primary.id).or_insert_with(|| DuplicateGroup {
        primary: primary.id,
        primary_name: primary.institution_name.clone(),
        duplicates: Vec::new(),
    });
    group.duplicates.push(GroupEntry {
        id: duplicate.id,
        name: duplicate.institution_name.clone(),
        similarity: found.similarity,
        reasons: found.reasons,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::LeadId;

    fn lead(id: i64, name: &str, state: &str) -> Lead {
        Lead::with_id(LeadId::new(id), name, state)
    }

    #[test]
    fn empty_and_single_lead_scans() {
        let config = MatcherConfig::default();
        let result = scan(&[], &config);
        assert_eq!(result.total_leads, 0);
        assert!(result.groups.is_empty());

        let result = scan(&[lead(1, "Jefferson County", "AL")], &config);
        assert_eq!(result.total_leads, 1);
        assert_eq!(result.duplicates_found, 0);
    }

    #[test]
    fn pairs_group_under_lower_id() {
        let leads = vec![
            lead(3, "Jefferson County", "AL"),
            lead(1, "Jefferson County", "AL"),
            lead(2, "Montgomery Parks", "AL"),
        ];
        let result = scan(&leads, &MatcherConfig::default());
        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.primary, LeadId::new(1));
        assert_eq!(group.duplicates.len(), 1);
        assert_eq!(group.duplicates[0].id, LeadId::new(3));
    }

    #[test]
    fn duplicate_ids_in_input_are_not_self_compared() {
        let leads = vec![
            lead(1, "Jefferson County", "AL"),
            lead(1, "Jefferson County", "AL"),
        ];
        let result = scan(&leads, &MatcherConfig::default());
        assert_eq!(result.duplicates_found, 0);
        for group in &result.groups {
            for entry in &group.duplicates {
                assert_ne!(entry.id, group.primary);
            }
        }
    }

    #[test]
    fn groups_sorted_by_descending_size() {
        let leads = vec![
            // Cluster of three identical names -> group 1 with two duplicates.
            lead(1, "Jefferson County", "AL"),
            lead(2, "Jefferson County", "AL"),
            lead(3, "Jefferson County", "AL"),
            // Pair -> group 4 with one duplicate.
            lead(4, "Montgomery Parks", "AL"),
            lead(5, "Montgomery Parks", "AL"),
        ];
        let result = scan(&leads, &MatcherConfig::default());
        assert_eq!(result.groups.len(), 2);
        assert_eq!(result.groups[0].primary, LeadId::new(1));
        assert_eq!(result.groups[0].size(), 2);
        assert_eq!(result.groups[1].primary, LeadId::new(4));
        assert_eq!(result.groups[1].size(), 1);
        assert_eq!(result.duplicates_found, 3);
    }

    #[test]
    fn lead_joins_at_most_one_group_as_duplicate() {
        let leads = vec![
            lead(1, "Jefferson County", "AL"),
            lead(2, "Jefferson County", "AL"),
            lead(3, "Jefferson County", "AL"),
        ];
        let result = scan(&leads, &MatcherConfig::default());

        let mut seen: HashSet<LeadId> = HashSet::new();
        for group in &result.groups {
            for entry in &group.duplicates {
                assert!(seen.insert(entry.id), "{} appears in two groups", entry.id);
            }
        }
        // All three collapse under the lowest id; no group anchored at 2.
        assert_eq!(result.groups.len(), 1);
    }

    #[test]
    fn cross_state_pairs_never_group() {
        let leads = vec![
            lead(1, "Jefferson County", "AL"),
            lead(2, "Jefferson County", "GA"),
        ];
        let result = scan(&leads, &MatcherConfig::default());
        assert!(result.groups.is_empty());
    }

    #[test]
    fn blocked_scan_agrees_on_shared_prefix_duplicates() {
        let leads = vec![
            lead(1, "Jefferson County", "AL"),
            lead(2, "Jefferson Co", "AL"),
            lead(3, "Montgomery Parks", "AL"),
        ];
        let config = MatcherConfig::default();
        let full = scan(&leads, &config);
        let blocked = scan_with(
            &leads,
            &config,
            ScanOptions { blocking: Blocking::StatePrefix { prefix_len: 4 } },
        );
        assert_eq!(blocked.groups.len(), full.groups.len());
        assert_eq!(blocked.groups[0].primary, full.groups[0].primary);
        assert_eq!(blocked.duplicates_found, full.duplicates_found);
    }

    #[test]
    fn blocked_scan_skips_diverging_prefixes() {
        // Same department, but a leading qualifier pushes the names into
        // different buckets; the blocked scan cannot see the pair.
        let leads = vec![
            lead(1, "Roads Division", "AL"),
            lead(2, "County Roads Division", "AL"), // normalizes to "roads division"
            lead(3, "Old Roads Division", "AL"),
        ];
        let config = MatcherConfig::default();
        let blocked = scan_with(
            &leads,
            &config,
            ScanOptions { blocking: Blocking::StatePrefix { prefix_len: 8 } },
        );
        let full = scan(&leads, &config);
        assert!(blocked.duplicates_found < full.duplicates_found);
    }
}
