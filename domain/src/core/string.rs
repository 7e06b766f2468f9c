//! String utilities for the domain layer.

/// Shorten a string to at most `max_chars` characters, ending in `…` when cut.
///
/// Counts `char`s rather than bytes so multi-byte topics and role names line
/// up in fixed-width listings.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
