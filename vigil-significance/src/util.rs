//! Small text helpers shared by the matcher, qualifier, and differ.
//!
//! All slicing here is character-based so multi-byte content never splits a
//! UTF-8 boundary.

/// First `n` characters of `s` (the whole string if shorter).
pub(crate) fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Last `n` characters of `s` (the whole string if shorter).
pub(crate) fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
