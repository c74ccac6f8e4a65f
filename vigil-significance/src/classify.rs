//! Significance and sentiment classification.
//!
//! The significance rules form an ordered table evaluated first-match-wins,
//! so precedence is explicit and each rule is unit-testable on its own.
//! Only qualifying matches (not negated, not false-positive) count toward
//! rule thresholds; flagged matches instead subtract their lost weight from
//! the rule confidence.

use crate::types::{
    AnalysisResult, ChangeMagnitude, Classification, KeywordMatch, Polarity, Sentiment,
    ValidationOutcome,
};

// ============================================================================
// Rule Table
// ============================================================================

/// Aggregated evidence a rule predicate looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInput {
    /// Qualifying positive match count
    pub positive: usize,
    /// Qualifying negative match count
    pub negative: usize,
    /// Insignificant-tier patterns matched and nothing else qualified
    pub only_insignificant: bool,
    /// Change magnitude, absent for news-article analysis
    pub magnitude: Option<ChangeMagnitude>,
}

/// Verdict produced by a matched rule, before flag penalties.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub classification: Classification,
    pub confidence: f64,
    pub note: String,
}

/// One ordered `(predicate, outcome)` pair.
pub struct Rule {
    pub name: &'static str,
    applies: fn(&RuleInput) -> bool,
    outcome: fn(&RuleInput) -> RuleOutcome,
}

impl Rule {
    pub fn applies(&self, input: &RuleInput) -> bool {
        (self.applies)(input)
    }

    pub fn outcome(&self, input: &RuleInput) -> RuleOutcome {
        (self.outcome)(input)
    }
}

/// Significance rules in precedence order. The negative-cluster rule sits
/// above the positive one so mixed 2/2 content resolves as significant with
/// the sentiment reporting the mix. The final rule is a catch-all, keeping
/// the table total.
pub const RULES: &[Rule] = &[
    Rule {
        name: "noise_only",
        applies: |i| {
            i.positive == 0
                && i.negative == 0
                && i.only_insignificant
                && i.magnitude == Some(ChangeMagnitude::Minor)
        },
        outcome: |_| RuleOutcome {
            classification: Classification::Insignificant,
            confidence: 0.85,
            note: "Only insignificant patterns detected with minor changes".to_string(),
        },
    },
    Rule {
        name: "no_signals",
        applies: |i| i.positive == 0 && i.negative == 0,
        outcome: |_| RuleOutcome {
            classification: Classification::Insignificant,
            confidence: 0.75,
            note: "No significant keywords detected".to_string(),
        },
    },
    Rule {
        name: "negative_cluster",
        applies: |i| i.negative >= 2,
        outcome: |i| RuleOutcome {
            classification: Classification::Significant,
            confidence: (0.80 + 0.05 * (i.negative - 2) as f64).min(0.95),
            note: format!(
                "Multiple negative signals detected ({} negative keywords)",
                i.negative
            ),
        },
    },
    Rule {
        name: "positive_cluster",
        applies: |i| i.positive >= 2,
        outcome: |i| RuleOutcome {
            classification: Classification::Significant,
            confidence: (0.80 + 0.05 * (i.positive - 2) as f64).min(0.90),
            note: format!(
                "Multiple positive signals detected ({} positive keywords)",
                i.positive
            ),
        },
    },
    // One positive and one negative signal cancel out: no cluster formed,
    // no polarity dominates, so the content reads as routine.
    Rule {
        name: "offsetting_signals",
        applies: |i| i.positive >= 1 && i.negative >= 1,
        outcome: |_| RuleOutcome {
            classification: Classification::Insignificant,
            confidence: 0.75,
            note: "One positive and one negative signal offset each other".to_string(),
        },
    },
    Rule {
        name: "single_keyword_major",
        applies: |i| i.positive + i.negative == 1 && i.magnitude == Some(ChangeMagnitude::Major),
        outcome: |_| RuleOutcome {
            classification: Classification::Significant,
            confidence: 0.70,
            note: "Single keyword with major content change".to_string(),
        },
    },
    // Catch-all: exactly one keyword with minor, moderate, or no magnitude.
    // Without a severity signal there is nothing to justify escalation.
    Rule {
        name: "single_keyword_weak",
        applies: |_| true,
        outcome: |i| RuleOutcome {
            classification: Classification::Uncertain,
            confidence: 0.50,
            note: match i.magnitude {
                Some(m) => format!("Single keyword with {m} content change"),
                None => "Single keyword with no change magnitude available".to_string(),
            },
        },
    },
];

/// Evaluate the rule table, first match wins.
pub fn evaluate_rules(input: &RuleInput) -> RuleOutcome {
    for rule in RULES {
        if rule.applies(input) {
            return rule.outcome(input);
        }
    }
    // The last rule is a catch-all, so this is unreachable; keep the table
    // total anyway rather than panic.
    RuleOutcome {
        classification: Classification::Uncertain,
        confidence: 0.50,
        note: "No rule matched".to_string(),
    }
}

// ============================================================================
// Sentiment
// ============================================================================

/// Sentiment from qualifying polarity counts.
pub fn sentiment_for(positive: usize, negative: usize) -> Sentiment {
    if positive >= 2 && negative >= 2 {
        Sentiment::Mixed
    } else if negative >= 2 {
        Sentiment::Negative
    } else if positive >= 2 {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Combine qualified matches and magnitude into a final keyword-only verdict.
pub fn classify(matches: &[KeywordMatch], magnitude: Option<ChangeMagnitude>) -> AnalysisResult {
    let qualifying_positive = count_qualifying(matches, Polarity::Positive);
    let qualifying_negative = count_qualifying(matches, Polarity::Negative);
    let insignificant: Vec<&KeywordMatch> = matches
        .iter()
        .filter(|m| m.polarity == Polarity::Insignificant)
        .collect();

    let input = RuleInput {
        positive: qualifying_positive,
        negative: qualifying_negative,
        only_insignificant: !insignificant.is_empty(),
        magnitude,
    };

    let outcome = evaluate_rules(&input);

    // Flagged matches subtract the weight they lost; a negated match costs
    // 0.20, a false positive 0.30, both together 0.44. Fixed-confidence
    // rules (no qualifying evidence) are not penalized.
    let mut confidence = outcome.confidence;
    if qualifying_positive + qualifying_negative > 0 {
        let penalty: f64 = matches
            .iter()
            .filter(|m| m.polarity != Polarity::Insignificant && !m.is_qualifying())
            .map(|m| 1.0 - m.effective_weight())
            .sum();
        confidence = (confidence - penalty).max(0.0);
    }
    confidence = confidence.clamp(0.0, 1.0);

    let qualifying: Vec<&KeywordMatch> = matches
        .iter()
        .filter(|m| m.polarity != Polarity::Insignificant && m.is_qualifying())
        .collect();

    // Noise-only verdicts report the insignificant patterns; otherwise the
    // qualifying keywords drive the report.
    let reported: &[&KeywordMatch] = if input.positive == 0 && input.negative == 0 {
        &insignificant
    } else {
        &qualifying
    };

    let matched_keywords: Vec<String> = reported.iter().map(|m| m.keyword.clone()).collect();
    let mut matched_categories: Vec<String> = Vec::new();
    for m in reported {
        if !matched_categories.contains(&m.category) {
            matched_categories.push(m.category.clone());
        }
    }

    // Evidence keeps flagged matches (with their flags) for transparency.
    let evidence_snippets: Vec<String> = matches
        .iter()
        .filter(|m| m.polarity != Polarity::Insignificant)
        .map(|m| m.evidence_snippet())
        .collect();

    AnalysisResult {
        classification: outcome.classification,
        sentiment: sentiment_for(qualifying_positive, qualifying_negative),
        confidence,
        matched_keywords,
        matched_categories,
        notes: Some(outcome.note),
        evidence_snippets,
        validation: ValidationOutcome::Skipped,
    }
}

fn count_qualifying(matches: &[KeywordMatch], polarity: Polarity) -> usize {
    matches
        .iter()
        .filter(|m| m.polarity == polarity && m.is_qualifying())
        .count()
}

// ============================================================================
// Tests
// ============================================================================
