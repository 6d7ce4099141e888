//! Canonical-form string preparation for comparison.
//!
//! Institution names arrive from scrapers and manual entry with wildly
//! inconsistent casing, punctuation, and boilerplate ("County of ...",
//! "... Department"). Every similarity decision in the crate runs on the
//! output of [`normalize`], so two spellings of the same department compare
//! equal before any edit-distance work happens.

/// Generic words that carry no identity signal in government institution
/// names. Removed at word granularity after punctuation stripping.
const STOPWORDS: &[&str] = &[
    "county",
    "city",
    "district",
    "department",
    "office",
    "of",
    "the",
];

/// Canonicalizes a free-text field for comparison.
///
/// Lower-cases, strips everything that is not a word character or
/// whitespace, collapses internal whitespace, and drops the stopword set.
/// Pure and idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use leadmatch::normalize;
///
/// assert_eq!(normalize("The County of Jefferson!"), "jefferson");
/// assert_eq!(normalize("  Parks &  Recreation Dept. "), "parks recreation dept");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_' || ch.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`normalize`] lifted over optional fields. Absent input normalizes to the
/// empty string.
#[must_use]
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}

/// Extracts the domain part of an email address, ASCII-lowercased.
///
/// Returns `None` when the input has no `@` or nothing after it.
#[must_use]
pub fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.rsplit_once('@')?;
    let domain = domain.trim().to_ascii_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Reduces a phone number to its digits.
#[must_use]
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Canonicalizes a website URL for equality comparison: strips the scheme,
/// a leading `www.`, and any trailing slash, then ASCII-lowercases.
///
/// # Examples
///
/// ```
/// use leadmatch::website_host;
///
/// assert_eq!(website_host("https://www.jeffco.al.gov/"), "jeffco.al.gov");
/// assert_eq!(website_host("jeffco.al.gov"), "jeffco.al.gov");
/// ```
#[must_use]
pub fn website_host(url: &str) -> String {
    let trimmed = url.trim().to_ascii_lowercase();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(&trimmed);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}
