//! Edit-distance similarity scoring.
//!
//! Produces the 0-100 integer similarity every matching decision is built
//! on. Inputs are normalized first, so the score is independent of casing,
//! punctuation, and institution-name boilerplate.

use strsim::levenshtein;

use crate::normalize::normalize;

/// Computes a 0-100 similarity between two strings.
///
/// Both inputs are normalized; equal normal forms score 100, and an empty
/// normal form on either side scores 0. Otherwise the score is the
/// Levenshtein distance scaled against the longer normal form:
/// `round((1 - d / max_len) * 100)`.
///
/// Symmetric: `similarity(a, b) == similarity(b, a)`.
///
/// # Examples
///
/// ```
/// use leadmatch::similarity;
///
/// assert_eq!(similarity("Jefferson County", "JEFFERSON COUNTY!"), 100);
/// assert_eq!(similarity("Jefferson County", ""), 0);
/// assert!(similarity("Jefferson County", "Jefferson Co") >= 70);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let distance = levenshtein(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());

    // distance <= max_len, so the ratio stays in [0, 1].
    ((1.0 - distance as f64 / max_len as f64) * 100.0).round() as u8
}
