//! Merge reconciliation.
//!
//! [`reconcile`] folds a merge-losing lead into the surviving one. The keep
//! lead's scalar values always win when present; enrichment collections
//! survive as a deduplicated union. The function is pure: reading both
//! records, persisting the result, and deleting the loser is the engine's
//! job.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::lead::Lead;

fn absent(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn fill_scalar(keep: &mut Option<String>, merge: &Option<String>) {
    if absent(keep.as_deref()) && !absent(merge.as_deref()) {
        *keep = merge.clone();
    }
}

fn union_strings(keep: &mut Vec<String>, merge: &[String]) {
    for item in merge {
        if !keep.contains(item) {
            keep.push(item.clone());
        }
    }
}

/// Shallow keep-wins merge of the loose metadata bags.
fn merge_metadata(keep: &Value, merge: &Value) -> Value {
    match (keep, merge) {
        (Value::Null, other) => other.clone(),
        (Value::Object(a), Value::Object(b)) => {
            let mut out = a.clone();
            for (k, v) in b {
                out.entry(k.clone()).or_insert_with(|| v.clone());
            }
            Value::Object(out)
        }
        (a, _) => a.clone(),
    }
}

/// Produces the surviving record of a merge, without touching any store.
///
/// - Scalar contact fields are copied from `merge` only where `keep` has no
///   value (empty strings count as no value).
/// - `pain_points`, `tech_stack`, and `buying_signals` become the ordered
///   union of both lists, keep side first, duplicates dropped.
/// - Decision makers are unioned by exact `name`; news items by `url`.
/// - An audit line referencing the losing lead is appended below any
///   existing notes.
///
/// `merged_at` stamps the audit line; the store refreshes `updated_at` when
/// the result is persisted.
#[must_use]
pub fn reconcile(keep: &Lead, merge: &Lead, merged_at: DateTime<Utc>) -> Lead {
    let mut out = keep.clone();

    fill_scalar(&mut out.phone, &merge.phone);
    fill_scalar(&mut out.email, &merge.email);
    fill_scalar(&mut out.website, &merge.website);
    fill_scalar(&mut out.city, &merge.city);

    if out.population.is_none() {
        out.population = merge.population;
    }
    if out.annual_budget.is_none() {
        out.annual_budget = merge.annual_budget;
    }
    if out.tech_maturity_score.is_none() {
        out.tech_maturity_score = merge.tech_maturity_score;
    }

    union_strings(&mut out.pain_points, &merge.pain_points);
    union_strings(&mut out.tech_stack, &merge.tech_stack);
    union_strings(&mut out.buying_signals, &merge.buying_signals);

    for contact in &merge.decision_makers {
        if !out.decision_makers.iter().any(|c| c.name == contact.name) {
            out.decision_makers.push(contact.clone());
        }
    }

    for item in &merge.recent_news {
        if !out.recent_news.iter().any(|n| n.url == item.url) {
            out.recent_news.push(item.clone());
        }
    }

    out.metadata = merge_metadata(&keep.metadata, &merge.metadata);

    let audit = format!(
        "Merged with lead #{} ({}) on {}",
        merge.id,
        merge.institution_name,
        merged_at.to_rfc3339()
    );
    out.notes = Some(match keep.notes.as_deref() {
        Some(existing) if !existing.trim().is_empty() => format!("{existing}\n{audit}"),
        _ => audit,
    });

    out
}
