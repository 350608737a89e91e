//! Receiver list parsing.
//!
//! The host platform stores the receiver list as one multi-line option
//! value; this module turns it into an ordered list of conversation
//! ids.

/// Splits a raw multi-line option value into receiver ids.
///
/// Lines are trimmed of surrounding whitespace and blank lines are
/// dropped; the remaining ids keep their original order and are not
/// deduplicated. An empty value yields an empty list, which callers
/// treat as "not configured" rather than a parse failure.
pub fn parse_receivers(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
