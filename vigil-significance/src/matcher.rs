//! Keyword matcher: locates every dictionary phrase occurrence in a content
//! body, with position and surrounding context.
//!
//! Scanning is a single case-insensitive pass over the content for all tiers
//! at once; each occurrence of each phrase produces its own match record
//! because occurrence counts matter to the classifier.

use std::sync::Arc;

use crate::keywords::KeywordDictionary;
use crate::types::KeywordMatch;
use crate::util::{first_chars, last_chars};

/// Characters of context captured on each side of a match.
const CONTEXT_WINDOW: usize = 50;

/// Dictionary-driven phrase scanner.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    dictionary: Arc<KeywordDictionary>,
}

impl KeywordMatcher {
    pub fn new(dictionary: Arc<KeywordDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    /// Find all keyword occurrences in `content`, in position order.
    ///
    /// Occurrences of different phrases may overlap (e.g. "funding" inside
    /// "funding round"); each is reported separately. Matches embedded in a
    /// longer word ("refunding") are rejected.
    pub fn find_matches(&self, content: &str) -> Vec<KeywordMatch> {
        let mut matches = Vec::new();

        for hit in self.dictionary.automaton().find_overlapping_iter(content) {
            let entry = &self.dictionary.entries()[hit.pattern().as_usize()];
            let (start, end) = (hit.start(), hit.end());

            if !on_word_boundary(content, start, end) {
                continue;
            }

            let context_before = last_chars(&content[..start], CONTEXT_WINDOW)
                .trim()
                .to_string();
            let context_after = first_chars(&content[end..], CONTEXT_WINDOW)
                .trim()
                .to_string();

            matches.push(KeywordMatch {
                keyword: entry.term.clone(),
                category: entry.category.clone(),
                polarity: entry.polarity,
                position: start,
                context_before,
                context_after,
                is_negated: false,
                is_false_positive: false,
            });
        }

        matches.sort_by_key(|m| m.position);
        matches
    }
}

/// Word-boundary check in the spirit of `\b`: an alphanumeric phrase edge
/// must not touch an adjacent alphanumeric character. Non-alphanumeric edges
/// (e.g. "(c)", "margin:") need no boundary on that side.
fn on_word_boundary(content: &str, start: usize, end: usize) -> bool {
    let matched = &content[start..end];

    if matched
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric())
        && content[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric())
    {
        return false;
    }

    if matched
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric())
        && content[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric())
    {
        return false;
    }

    true
}

// ============================================================================
// Tests
// ============================================================================
