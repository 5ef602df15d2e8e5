//! Name normalization for resolution join keys
//!
//! A normalized name is the display name trimmed, lower-cased and with every
//! internal whitespace run collapsed to a single space. Punctuation is kept:
//! `"Brand - Exact"` and `"Brand Exact"` are different entities.
//!
//! The normalized form is a join key only, never a display value.

/// Normalize a display name for matching.
///
/// # Examples
///
/// ```
/// use ads_resolver::normalize::normalize_name;
///
/// assert_eq!(normalize_name("  Brand   Defense "), "brand defense");
/// assert_eq!(normalize_name("SP | Auto\tShoes"), "sp | auto shoes");
/// ```
pub fn normalize_name(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize an optional field; blank values become `None`
pub fn normalize_opt(s: Option<&str>) -> Option<String> {
    s.map(normalize_name).filter(|n| !n.is_empty())
}

/// Treat a blank already-normalized value as absent
pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}
