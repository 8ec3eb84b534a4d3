//! Canonical form for free-text geographic names.
//!
//! Names from the bibliographic source, the code table and the area table
//! only become comparable after they share one spelling: ASCII, lowercase,
//! no whitespace at all ("São Paulo" -> "saopaulo", "New  York" -> "newyork").

use deunicode::deunicode_with_tofu;

/// Canonicalize a geographic name.
///
/// Transliteration runs first because it can emit spaces and capitals
/// (`"北京"` -> `"Bei Jing "`); characters with no ASCII equivalent are dropped.
pub fn normalize(text: &str) -> String {
    deunicode_with_tofu(text, "")
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Like [`normalize`], with absent values mapped to the empty string
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
