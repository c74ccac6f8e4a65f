//! Match qualifier: negation detection and false-positive suppression.
//!
//! Both passes work on the context window the matcher captured around each
//! occurrence. Flagged matches keep a reduced confidence weight (see
//! [`KeywordMatch::effective_weight`]) and are excluded from the
//! classifier's rule-selection counts, but stay in the evidence output.

use crate::keywords::{FALSE_POSITIVE_PHRASES, NEGATION_MARKERS, NEGATION_SUFFIXES};
use crate::types::KeywordMatch;
use crate::util::last_chars;

/// Characters of leading context inspected for a negation marker.
const NEGATION_PREFIX_WINDOW: usize = 20;

/// Applies the two heuristic correction passes to matcher output.
#[derive(Debug, Clone)]
pub struct MatchQualifier {
    negation_markers: Vec<String>,
    negation_suffixes: Vec<String>,
    false_positive_phrases: Vec<String>,
}

impl MatchQualifier {
    /// Qualifier with the built-in marker and override lists.
    pub fn new() -> Self {
        Self {
            negation_markers: NEGATION_MARKERS.iter().map(|s| s.to_string()).collect(),
            negation_suffixes: NEGATION_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            false_positive_phrases: FALSE_POSITIVE_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Run both passes over every match, setting the two boolean flags.
    pub fn qualify(&self, matches: &mut [KeywordMatch]) {
        for m in matches.iter_mut() {
            m.is_negated = self.is_negated(m);
            m.is_false_positive = self.is_false_positive(m);
        }
    }

    /// Prefix negation ("no funding", "not acquired") plus suffix negation
    /// ("funding status: none", "funding date: n/a").
    fn is_negated(&self, m: &KeywordMatch) -> bool {
        let before = m.context_before.to_lowercase();
        let prefix = last_chars(&before, NEGATION_PREFIX_WINDOW).trim();
        // Pad with spaces so markers only match as whole words
        let padded = format!(" {prefix} ");
        if self
            .negation_markers
            .iter()
            .any(|marker| padded.contains(&format!(" {marker} ")))
        {
            return true;
        }

        let after = m.context_after.to_lowercase();
        let suffix = after.trim_start();
        self.negation_suffixes
            .iter()
            .any(|pattern| suffix.starts_with(pattern.as_str()))
    }

    /// True when the occurrence sits inside a known false-positive phrase
    /// ("talent acquisition", "self-funded", ...).
    fn is_false_positive(&self, m: &KeywordMatch) -> bool {
        let window = format!(
            "{} {} {}",
            m.context_before.to_lowercase(),
            m.keyword,
            m.context_after.to_lowercase()
        );
        let keyword_start = m.context_before.to_lowercase().len() + 1;
        let keyword_end = keyword_start + m.keyword.len();

        self.false_positive_phrases.iter().any(|phrase| {
            window
                .match_indices(phrase.as_str())
                .any(|(idx, _)| idx < keyword_end && idx + phrase.len() > keyword_start)
        })
    }
}

impl Default for MatchQualifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
