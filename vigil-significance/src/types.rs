//! Core data model for significance analysis.
//!
//! All types here are plain values: they are produced once per analysis call
//! and never persisted by this crate. Callers store the flat fields of
//! [`AnalysisResult`] however they like.

use serde::{Deserialize, Serialize};

/// Confidence weight factor applied to a negated match.
pub const NEGATION_WEIGHT: f64 = 0.8;

/// Confidence weight factor applied to a false-positive match.
pub const FALSE_POSITIVE_WEIGHT: f64 = 0.7;

/// Polarity of a keyword tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Good-news vocabulary (funding, launches, growth, ...)
    Positive,
    /// Bad-news vocabulary (closures, layoffs, breaches, ...)
    Negative,
    /// Noise vocabulary (CSS churn, copyright notices, tracking pixels)
    Insignificant,
}

/// Coarse measure of how much two content snapshots differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeMagnitude {
    /// Similarity >= 0.90
    Minor,
    /// Similarity in [0.50, 0.90)
    Moderate,
    /// Similarity < 0.50
    Major,
}

impl ChangeMagnitude {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
        }
    }
}

impl std::fmt::Display for ChangeMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final business-significance verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Significant,
    Insignificant,
    Uncertain,
}

impl Classification {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Significant => "significant",
            Self::Insignificant => "insignificant",
            Self::Uncertain => "uncertain",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment derived from keyword polarity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the external validator influenced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationOutcome {
    /// Validator disabled or not configured; never invoked
    #[default]
    Skipped,
    /// Validator ran and its verdict superseded the keyword-only result
    Applied,
    /// Validator was invoked but failed; keyword-only result kept
    Failed,
}

/// One located keyword occurrence with surrounding context.
///
/// Produced by the matcher; the qualifier sets the two boolean flags before
/// the match is handed (frozen) to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Dictionary phrase that matched (canonical lowercase form)
    pub keyword: String,
    /// Reporting category the phrase belongs to
    pub category: String,
    /// Tier polarity of the phrase
    pub polarity: Polarity,
    /// Byte offset of the occurrence in the analyzed content
    pub position: usize,
    /// Up to 50 characters of trimmed context before the occurrence
    pub context_before: String,
    /// Up to 50 characters of trimmed context after the occurrence
    pub context_after: String,
    /// True when a negation marker precedes the keyword
    pub is_negated: bool,
    /// True when the occurrence is part of a known false-positive phrase
    pub is_false_positive: bool,
}

impl KeywordMatch {
    /// A qualifying match counts toward classification rule thresholds.
    pub fn is_qualifying(&self) -> bool {
        !self.is_negated && !self.is_false_positive
    }

    /// Confidence weight of this match relative to an unflagged one.
    ///
    /// Negation and false-positive factors compose multiplicatively:
    /// a match with both flags keeps 0.8 * 0.7 = 0.56 of its weight.
    pub fn effective_weight(&self) -> f64 {
        let mut weight = 1.0;
        if self.is_negated {
            weight *= NEGATION_WEIGHT;
        }
        if self.is_false_positive {
            weight *= FALSE_POSITIVE_WEIGHT;
        }
        weight
    }

    /// Human-readable evidence line for this match.
    pub fn evidence_snippet(&self) -> String {
        let mut snippet = format!(
            "{} [{}] {}",
            self.context_before, self.keyword, self.context_after
        );
        if self.is_negated {
            snippet.push_str(" (negated)");
        }
        if self.is_false_positive {
            snippet.push_str(" (false positive)");
        }
        snippet
    }
}

/// Final result of one significance analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Significance verdict
    pub classification: Classification,
    /// Sentiment derived from keyword evidence
    pub sentiment: Sentiment,
    /// Confidence in [0.0, 1.0]
    pub confidence: f64,
    /// Qualifying keywords that drove the verdict
    pub matched_keywords: Vec<String>,
    /// Categories of the qualifying keywords (deduplicated, match order)
    pub matched_categories: Vec<String>,
    /// Explanation of the verdict (rule note or validator reasoning)
    pub notes: Option<String>,
    /// Evidence lines, including flagged matches for transparency
    pub evidence_snippets: Vec<String>,
    /// Whether the external validator influenced this result
    #[serde(default)]
    pub validation: ValidationOutcome,
}

/// Successful response from the external validator.
///
/// Failure modes are carried separately as an error variant, never encoded
/// in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalValidationResult {
    pub classification: Classification,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub validated_keywords: Vec<String>,
    #[serde(default)]
    pub false_positives: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> KeywordMatch {
        KeywordMatch {
            keyword: "funding".to_string(),
            category: "funding_investment".to_string(),
            polarity: Polarity::Positive,
            position: 3,
            context_before: "no".to_string(),
            context_after: "was received".to_string(),
            is_negated: false,
            is_false_positive: false,
        }
    }

    #[test]
    fn test_effective_weight_composition() {
        let mut m = sample_match();
        assert!((m.effective_weight() - 1.0).abs() < 1e-9);

        m.is_negated = true;
        assert!((m.effective_weight() - 0.8).abs() < 1e-9);

        m.is_false_positive = true;
        assert!((m.effective_weight() - 0.56).abs() < 1e-9);

        m.is_negated = false;
        assert!((m.effective_weight() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_qualifying() {
        let mut m = sample_match();
        assert!(m.is_qualifying());
        m.is_negated = true;
        assert!(!m.is_qualifying());
    }

    #[test]
    fn test_evidence_snippet_flags() {
        let mut m = sample_match();
        assert_eq!(m.evidence_snippet(), "no [funding] was received");
        m.is_negated = true;
        assert_eq!(m.evidence_snippet(), "no [funding] was received (negated)");
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&Classification::Significant).unwrap(),
            "\"significant\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeMagnitude::Moderate).unwrap(),
            "\"moderate\""
        );
        let m: ChangeMagnitude = serde_json::from_str("\"major\"").unwrap();
        assert_eq!(m, ChangeMagnitude::Major);
    }
}
