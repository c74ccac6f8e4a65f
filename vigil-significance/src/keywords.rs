//! Keyword dictionary: the static catalog of recognized business-event
//! vocabulary, grouped into positive, negative, and insignificant tiers.
//!
//! The dictionary is built once at startup and shared by reference; it is
//! never mutated afterwards, so concurrent analyses need no locking.

use aho_corasick::AhoCorasick;

use vigil_common::error::{Error, Result};

use crate::types::Polarity;

// ============================================================================
// Tier Tables
// ============================================================================

/// Positive tier: good-news vocabulary, 7 categories.
const POSITIVE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "funding_investment",
        &[
            "funding",
            "raised",
            "series a",
            "series b",
            "series c",
            "series d",
            "series e",
            "venture capital",
            "seed round",
            "valuation",
            "unicorn",
            "pre-seed",
            "funding round",
            "investment round",
            "capital raise",
            "angel round",
        ],
    ),
    (
        "product_launch",
        &[
            "launched",
            "new product",
            "beta release",
            "general availability",
            "rollout",
            "product launch",
            "new feature",
            "release",
            "public beta",
            "early access",
        ],
    ),
    (
        "growth_success",
        &[
            "revenue growth",
            "profitable",
            "milestone",
            "arr",
            "mrr",
            "doubled",
            "tripled",
            "record revenue",
            "growth rate",
            "user growth",
        ],
    ),
    (
        "partnerships",
        &[
            "partnership",
            "strategic alliance",
            "joint venture",
            "signed deal",
            "collaboration",
            "partner",
            "teaming up",
        ],
    ),
    (
        "expansion",
        &[
            "expansion",
            "new office",
            "international",
            "hiring",
            "scale up",
            "new market",
            "global expansion",
            "opened office",
            "expanding team",
        ],
    ),
    (
        "recognition",
        &[
            "award",
            "winner",
            "top 10",
            "best of",
            "innovation award",
            "recognized",
            "honored",
            "named to",
            "included in",
        ],
    ),
    (
        "ipo_exit",
        &[
            "ipo",
            "going public",
            "filed s-1",
            "direct listing",
            "nasdaq",
            "nyse",
            "stock exchange",
            "public offering",
            "spac",
        ],
    ),
];

/// Negative tier: bad-news vocabulary, 9 categories.
const NEGATIVE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "closure",
        &[
            "shut down",
            "closed down",
            "ceased operations",
            "discontinued",
            "winding down",
            "shutting down",
            "closing",
            "going out of business",
            "no longer operating",
        ],
    ),
    (
        "layoffs_downsizing",
        &[
            "layoffs",
            "downsizing",
            "workforce reduction",
            "job cuts",
            "restructuring",
            "furlough",
            "laid off",
            "headcount reduction",
            "rif",
            "reduction in force",
        ],
    ),
    (
        "financial_distress",
        &[
            "bankruptcy",
            "insolvent",
            "chapter 11",
            "cash crunch",
            "debt crisis",
            "defaulted",
            "financial difficulties",
            "creditors",
            "liquidation",
        ],
    ),
    (
        "legal_issues",
        &[
            "lawsuit",
            "litigation",
            "investigation",
            "settlement",
            "fine",
            "penalty",
            "sued",
            "regulatory action",
            "compliance violation",
            "subpoena",
        ],
    ),
    (
        "security_breach",
        &[
            "data breach",
            "hacked",
            "cyberattack",
            "ransomware",
            "vulnerability",
            "security incident",
            "compromised",
            "unauthorized access",
        ],
    ),
    (
        "acquisition",
        &[
            "acquired by",
            "merged with",
            "sold to",
            "bought by",
            "takeover",
            "acquisition",
            "merger",
            "buyout",
        ],
    ),
    (
        "leadership_changes",
        &[
            "ceo resigned",
            "founder left",
            "stepping down",
            "ousted",
            "leadership change",
            "executive departure",
            "cto left",
        ],
    ),
    (
        "product_failures",
        &[
            "recall",
            "discontinued product",
            "defect",
            "safety issue",
            "product failure",
            "pulled from market",
        ],
    ),
    (
        "market_exit",
        &[
            "exiting market",
            "pulling out",
            "retreat",
            "abandoned",
            "market withdrawal",
            "leaving market",
        ],
    ),
];

/// Insignificant tier: page-noise vocabulary, 3 categories.
const INSIGNIFICANT_PATTERNS: &[(&str, &[&str])] = &[
    (
        "css_styling",
        &[
            "font-family",
            "background-color",
            "margin:",
            "padding:",
            ".css",
            "border-radius",
            "text-align",
            "font-size",
        ],
    ),
    (
        "copyright_year",
        &["(c)", "copyright", "all rights reserved"],
    ),
    (
        "tracking_analytics",
        &[
            "google-analytics",
            "gtag",
            "tracking",
            "pixel",
            "analytics",
            "hotjar",
            "mixpanel",
        ],
    ),
];

/// Phrases that co-opt a keyword's surface form without its business meaning.
pub const FALSE_POSITIVE_PHRASES: &[&str] = &[
    "talent acquisition",
    "customer acquisition",
    "data acquisition",
    "funding opportunities",
    "funding sources",
    "self-funded",
];

/// Markers that negate a keyword when they precede it.
pub const NEGATION_MARKERS: &[&str] = &["no", "not", "never", "without", "lacks", "none"];

/// Trailing patterns that negate a keyword (e.g. "funding status: none").
pub const NEGATION_SUFFIXES: &[&str] = &["status: none", "date: n/a", "status:none", "date:n/a"];

// ============================================================================
// Dictionary
// ============================================================================

/// One recognized phrase. Identity is `(term, category)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Canonical lowercase phrase
    pub term: String,
    /// Reporting category
    pub category: String,
    /// Tier polarity
    pub polarity: Polarity,
}

/// Read-only catalog of recognized terms with a prebuilt multi-pattern
/// automaton for single-pass scanning.
#[derive(Debug)]
pub struct KeywordDictionary {
    entries: Vec<KeywordEntry>,
    automaton: AhoCorasick,
}

impl KeywordDictionary {
    /// Build the built-in dictionary from the static tier tables.
    pub fn builtin() -> Self {
        let mut entries = Vec::new();
        for (tier, polarity) in [
            (POSITIVE_KEYWORDS, Polarity::Positive),
            (NEGATIVE_KEYWORDS, Polarity::Negative),
            (INSIGNIFICANT_PATTERNS, Polarity::Insignificant),
        ] {
            for (category, terms) in tier {
                for term in *terms {
                    entries.push(KeywordEntry {
                        term: (*term).to_string(),
                        category: (*category).to_string(),
                        polarity,
                    });
                }
            }
        }
        // The static tables are non-empty ASCII literals; building the
        // automaton from them cannot fail.
        Self::from_entries(entries).expect("builtin keyword tables always build")
    }

    /// Build a dictionary from custom entries.
    pub fn from_entries(entries: Vec<KeywordEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("keyword dictionary is empty".to_string()));
        }
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(entries.iter().map(|e| e.term.as_str()))
            .map_err(|e| Error::Config(format!("failed to build keyword automaton: {e}")))?;
        Ok(Self { entries, automaton })
    }

    /// All dictionary entries, in automaton pattern order.
    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    /// Number of entries across all tiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category names in a tier.
    pub fn categories(&self, polarity: Polarity) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if entry.polarity == polarity && !categories.contains(&entry.category.as_str()) {
                categories.push(entry.category.as_str());
            }
        }
        categories
    }

    pub(crate) fn automaton(&self) -> &AhoCorasick {
        &self.automaton
    }
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tier_shape() {
        let dict = KeywordDictionary::builtin();
        assert_eq!(dict.categories(Polarity::Positive).len(), 7);
        assert_eq!(dict.categories(Polarity::Negative).len(), 9);
        assert_eq!(dict.categories(Polarity::Insignificant).len(), 3);
        assert!(!dict.is_empty());
    }

    #[test]
    fn test_entry_polarity_lookup() {
        let dict = KeywordDictionary::builtin();
        let funding = dict
            .entries()
            .iter()
            .find(|e| e.term == "funding")
            .unwrap();
        assert_eq!(funding.polarity, Polarity::Positive);
        assert_eq!(funding.category, "funding_investment");

        let layoffs = dict
            .entries()
            .iter()
            .find(|e| e.term == "layoffs")
            .unwrap();
        assert_eq!(layoffs.polarity, Polarity::Negative);
        assert_eq!(layoffs.category, "layoffs_downsizing");
    }

    #[test]
    fn test_from_entries_rejects_empty() {
        assert!(KeywordDictionary::from_entries(Vec::new()).is_err());
    }

    #[test]
    fn test_terms_are_canonical_lowercase() {
        let dict = KeywordDictionary::builtin();
        assert!(dict
            .entries()
            .iter()
            .all(|e| e.term == e.term.to_lowercase()));
    }
}
