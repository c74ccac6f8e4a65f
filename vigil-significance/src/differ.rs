//! Content differ: similarity ratio, change magnitude, and diff extraction
//! between two content snapshots.
//!
//! Both inputs are truncated to their first 50,000 characters before
//! comparison to bound worst-case cost on very large pages.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use similar::{ChangeTag, DiffOp, TextDiff};

use crate::types::ChangeMagnitude;
use crate::util::first_chars;

/// Maximum characters compared per snapshot.
pub const MAX_COMPARISON_LENGTH: usize = 50_000;

/// Outcome of change detection between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeDetection {
    /// Whether the content changed at all
    pub changed: bool,
    /// Coarse change magnitude
    pub magnitude: ChangeMagnitude,
    /// Similarity ratio in [0.0, 1.0]
    pub similarity: f64,
}

/// Normalized similarity ratio between two content strings.
///
/// Symmetric, 1.0 for identical (truncated) inputs, computed as
/// `2 * matching_chars / total_chars` over a character-level diff.
pub fn similarity_ratio(old_content: &str, new_content: &str) -> f64 {
    let old_trimmed = first_chars(old_content, MAX_COMPARISON_LENGTH);
    let new_trimmed = first_chars(new_content, MAX_COMPARISON_LENGTH);

    if old_trimmed == new_trimmed {
        return 1.0;
    }

    let total = old_trimmed.chars().count() + new_trimmed.chars().count();
    if total == 0 {
        return 1.0;
    }

    let diff = TextDiff::from_chars(old_trimmed, new_trimmed);
    let matching: usize = diff
        .ops()
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum();

    2.0 * matching as f64 / total as f64
}

/// Map a similarity ratio to a change magnitude.
///
/// Bands are closed on their lower bound: 0.90 is minor, 0.50 is moderate.
pub fn magnitude_for(similarity: f64) -> ChangeMagnitude {
    if similarity >= 0.90 {
        ChangeMagnitude::Minor
    } else if similarity >= 0.50 {
        ChangeMagnitude::Moderate
    } else {
        ChangeMagnitude::Major
    }
}

/// Detect whether content changed between snapshots and how much.
///
/// Equal checksums short-circuit to no change. Differing checksums with
/// missing content degrade to a major change, since nothing can be compared.
pub fn detect_change(
    old_checksum: &str,
    new_checksum: &str,
    old_content: Option<&str>,
    new_content: Option<&str>,
) -> ChangeDetection {
    if old_checksum == new_checksum {
        return ChangeDetection {
            changed: false,
            magnitude: ChangeMagnitude::Minor,
            similarity: 1.0,
        };
    }

    let (Some(old), Some(new)) = (old_content, new_content) else {
        return ChangeDetection {
            changed: true,
            magnitude: ChangeMagnitude::Major,
            similarity: 0.0,
        };
    };

    let similarity = similarity_ratio(old, new);
    ChangeDetection {
        changed: true,
        magnitude: magnitude_for(similarity),
        similarity,
    }
}

/// SHA-256 checksum of content as a lowercase hex digest.
pub fn content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Lines added in `new_content` relative to `old_content`, newline-joined.
///
/// Pipelines feed this to the analyzer so keyword matching runs only on what
/// actually changed.
pub fn added_lines(old_content: &str, new_content: &str) -> String {
    let diff = TextDiff::from_lines(old_content, new_content);
    let mut added = String::new();
    for change in diff.iter_all_changes() {
        if change.tag() == ChangeTag::Insert {
            added.push_str(change.value());
            if !change.value().ends_with('\n') {
                added.push('\n');
            }
        }
    }
    added
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_content_ratio_one() {
        assert!((similarity_ratio("hello world", "hello world") - 1.0).abs() < 1e-9);
        assert!((similarity_ratio("", "") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_content_ratio_zero() {
        assert!(similarity_ratio("aaaa", "bbbb").abs() < 1e-9);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        let a = "the quick brown fox";
        let b = "the quick red fox";
        let ab = similarity_ratio(a, b);
        let ba = similarity_ratio(b, a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 0.0 && ab < 1.0);
    }

    #[test]
    fn test_exact_boundary_ratio() {
        // 9 shared chars out of 10+10 gives exactly 0.90
        let old = "aaaaaaaaab";
        let new = "aaaaaaaaac";
        let ratio = similarity_ratio(old, new);
        assert!((ratio - 0.90).abs() < 1e-9);
        assert_eq!(magnitude_for(ratio), ChangeMagnitude::Minor);
    }

    #[test]
    fn test_magnitude_bands() {
        assert_eq!(magnitude_for(1.0), ChangeMagnitude::Minor);
        assert_eq!(magnitude_for(0.90), ChangeMagnitude::Minor);
        assert_eq!(magnitude_for(0.89), ChangeMagnitude::Moderate);
        assert_eq!(magnitude_for(0.50), ChangeMagnitude::Moderate);
        assert_eq!(magnitude_for(0.49), ChangeMagnitude::Major);
        assert_eq!(magnitude_for(0.0), ChangeMagnitude::Major);
    }

    #[test]
    fn test_truncation_bounds_comparison() {
        // Identical beyond the comparison window: still reported identical
        let old = "a".repeat(MAX_COMPARISON_LENGTH + 1000);
        let mut new = "a".repeat(MAX_COMPARISON_LENGTH);
        new.push_str(&"b".repeat(1000));
        assert!((similarity_ratio(&old, &new) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_detect_change_equal_checksums() {
        let detection = detect_change("abc", "abc", None, None);
        assert!(!detection.changed);
        assert_eq!(detection.magnitude, ChangeMagnitude::Minor);
        assert!((detection.similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_detect_change_missing_content() {
        let detection = detect_change("abc", "def", None, None);
        assert!(detection.changed);
        assert_eq!(detection.magnitude, ChangeMagnitude::Major);
        assert!(detection.similarity.abs() < 1e-9);
    }

    #[test]
    fn test_detect_change_with_content() {
        let old = "Welcome to Acme. We build widgets.";
        let new = "Welcome to Acme. We build widgets. Now hiring!";
        let detection = detect_change("abc", "def", Some(old), Some(new));
        assert!(detection.changed);
        assert!(detection.similarity > 0.5);
    }

    #[test]
    fn test_content_checksum_stable() {
        let a = content_checksum("hello");
        let b = content_checksum("hello");
        let c = content_checksum("hello!");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_added_lines() {
        let old = "line one\nline two\n";
        let new = "line one\nline two\nline three\n";
        assert_eq!(added_lines(old, new), "line three\n");
    }

    #[test]
    fn test_added_lines_empty_when_no_additions() {
        let old = "line one\nline two\n";
        let new = "line one\n";
        assert_eq!(added_lines(old, new), "");
    }
}
