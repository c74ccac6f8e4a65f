//! Significance analysis façade.
//!
//! Orchestrates the keyword pipeline (match, qualify, classify) and the
//! optional external validation pass. The keyword path is total and pure:
//! any input string yields a valid [`AnalysisResult`]. Validation is the
//! only fallible step and every failure mode degrades the single item back
//! to its keyword-only result, never surfacing an error to the caller.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::keywords::KeywordDictionary;
use crate::matcher::KeywordMatcher;
use crate::qualifier::MatchQualifier;
use crate::types::{AnalysisResult, ChangeMagnitude, ValidationOutcome};
use crate::validator::{NoopValidator, SignificanceValidator, ValidationRequest};

/// Content excerpt length forwarded to the validator (characters).
const VALIDATION_EXCERPT_CHARS: usize = 2000;

/// The analysis entry point used by the change and news pipelines.
pub struct SignificanceAnalyzer {
    matcher: KeywordMatcher,
    qualifier: MatchQualifier,
    validator: Arc<dyn SignificanceValidator>,
}

impl SignificanceAnalyzer {
    /// Create an analyzer over the built-in dictionary.
    pub fn new(validator: Arc<dyn SignificanceValidator>) -> Self {
        Self::with_dictionary(Arc::new(KeywordDictionary::builtin()), validator)
    }

    /// Create an analyzer with a custom dictionary.
    pub fn with_dictionary(
        dictionary: Arc<KeywordDictionary>,
        validator: Arc<dyn SignificanceValidator>,
    ) -> Self {
        Self {
            matcher: KeywordMatcher::new(dictionary),
            qualifier: MatchQualifier::new(),
            validator,
        }
    }

    /// Create an analyzer that never consults an external validator.
    pub fn keyword_only() -> Self {
        Self::new(Arc::new(NoopValidator))
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        self.matcher.dictionary()
    }

    /// Keyword-only analysis: match, qualify, classify.
    ///
    /// Deterministic for identical inputs and never fails, including on
    /// empty content.
    pub fn analyze_keywords(
        &self,
        content: &str,
        magnitude: Option<ChangeMagnitude>,
    ) -> AnalysisResult {
        let mut matches = self.matcher.find_matches(content);
        self.qualifier.qualify(&mut matches);
        let result = classify(&matches, magnitude);

        debug!(
            classification = %result.classification,
            confidence = result.confidence,
            keywords = result.matched_keywords.len(),
            "Keyword analysis complete"
        );

        result
    }

    /// Full analysis: keyword pipeline, then the optional validation pass.
    ///
    /// When the validator is disabled the keyword result is returned as-is
    /// with `validation: skipped`. When validation fails the keyword result
    /// is kept and marked `validation: failed`.
    pub async fn analyze(
        &self,
        content: &str,
        magnitude: Option<ChangeMagnitude>,
    ) -> AnalysisResult {
        let mut result = self.analyze_keywords(content, magnitude);

        if !self.validator.is_enabled() {
            return result;
        }

        let request = ValidationRequest {
            content_excerpt: crate::util::first_chars(content, VALIDATION_EXCERPT_CHARS)
                .to_string(),
            keywords: result.matched_keywords.clone(),
            categories: result.matched_categories.clone(),
            initial_classification: result.classification,
            magnitude,
        };

        match self.validator.validate(&request).await {
            Ok(verdict) => {
                info!(
                    initial = %result.classification,
                    validated = %verdict.classification,
                    confidence = verdict.confidence,
                    "Validation applied"
                );
                result.classification = verdict.classification;
                result.sentiment = verdict.sentiment;
                result.confidence = verdict.confidence.clamp(0.0, 1.0);
                if !verdict.reasoning.is_empty() {
                    result.notes = Some(verdict.reasoning);
                }
                result.validation = ValidationOutcome::Applied;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Validation failed, keeping keyword-only result"
                );
                result.validation = ValidationOutcome::Failed;
            }
        }

        result
    }

    /// Analyze a news article by its headline and snippet.
    ///
    /// No change magnitude applies to article text, so magnitude-dependent
    /// rules see it as absent.
    pub async fn analyze_article(&self, title: &str, snippet: &str) -> AnalysisResult {
        let content = format!("{} {}", title, snippet);
        self.analyze(&content, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Classification, Sentiment};
    use crate::validator::bridge::{LlmValidator, LlmValidatorConfig};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyzer() -> SignificanceAnalyzer {
        SignificanceAnalyzer::keyword_only()
    }

    fn llm_analyzer(endpoint: &str) -> SignificanceAnalyzer {
        let validator = LlmValidator::new(LlmValidatorConfig {
            endpoint: endpoint.to_string(),
            api_key: Some("test-key".to_string()),
            timeout: Duration::from_secs(2),
            ..Default::default()
        });
        SignificanceAnalyzer::new(Arc::new(validator))
    }

    fn llm_reply(text: &str) -> serde_json::Value {
        serde_json::json!({ "content": [{ "type": "text", "text": text }] })
    }

    #[test]
    fn test_noise_only_minor_change() {
        let result = analyzer().analyze_keywords(
            "font-family: arial; copyright 2025 acme inc. all rights reserved",
            Some(ChangeMagnitude::Minor),
        );
        assert_eq!(result.classification, Classification::Insignificant);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_two_negative_keywords() {
        let result = analyzer().analyze_keywords(
            "acme announced layoffs and is shutting down its berlin office",
            Some(ChangeMagnitude::Moderate),
        );
        assert_eq!(result.classification, Classification::Significant);
        assert!((result.confidence - 0.80).abs() < 1e-9);
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!(result.matched_keywords.contains(&"layoffs".to_string()));
        assert!(result
            .matched_keywords
            .contains(&"shutting down".to_string()));
    }

    #[test]
    fn test_third_negative_keyword_raises_confidence() {
        let two = analyzer().analyze_keywords(
            "acme announced layoffs and is shutting down its berlin office",
            Some(ChangeMagnitude::Moderate),
        );
        let three = analyzer().analyze_keywords(
            "acme announced layoffs, is shutting down its berlin office, and faces bankruptcy",
            Some(ChangeMagnitude::Moderate),
        );
        assert!((two.confidence - 0.80).abs() < 1e-9);
        assert!((three.confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_two_positive_keywords() {
        let result = analyzer().analyze_keywords(
            "acme secured funding and announced a european expansion",
            Some(ChangeMagnitude::Moderate),
        );
        assert_eq!(result.classification, Classification::Significant);
        assert!((result.confidence - 0.80).abs() < 1e-9);
        assert_eq!(result.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_single_keyword_major_change() {
        let result = analyzer().analyze_keywords(
            "the company confirmed layoffs this morning",
            Some(ChangeMagnitude::Major),
        );
        assert_eq!(result.classification, Classification::Significant);
        assert!((result.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_single_keyword_minor_change() {
        let result = analyzer().analyze_keywords(
            "we are hiring engineers in lisbon",
            Some(ChangeMagnitude::Minor),
        );
        assert_eq!(result.classification, Classification::Uncertain);
        assert!((result.confidence - 0.50).abs() < 1e-9);
    }

    #[test]
    fn test_one_keyword_of_each_polarity() {
        let result = analyzer().analyze_keywords(
            "the team kept hiring despite the pending lawsuit",
            Some(ChangeMagnitude::Major),
        );
        assert_eq!(result.classification, Classification::Insignificant);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_empty_content() {
        let result = analyzer().analyze_keywords("", None);
        assert_eq!(result.classification, Classification::Insignificant);
        assert!((result.confidence - 0.75).abs() < 1e-9);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(result.matched_keywords.is_empty());
        assert!(result.evidence_snippets.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let content = "acme raised a series b round and announced a partnership with globex";
        let a = analyzer().analyze_keywords(content, Some(ChangeMagnitude::Moderate));
        let b = analyzer().analyze_keywords(content, Some(ChangeMagnitude::Moderate));
        assert_eq!(a, b);
    }

    #[test]
    fn test_confidence_in_bounds() {
        let contents = [
            "",
            "layoffs bankruptcy lawsuit data breach shut down recall hacked",
            "funding raised ipo partnership expansion award milestone profitable",
            "no funding without partnership talent acquisition customer acquisition",
            "font-family tracking pixel analytics",
        ];
        for content in contents {
            for magnitude in [
                None,
                Some(ChangeMagnitude::Minor),
                Some(ChangeMagnitude::Moderate),
                Some(ChangeMagnitude::Major),
            ] {
                let result = analyzer().analyze_keywords(content, magnitude);
                assert!(
                    (0.0..=1.0).contains(&result.confidence),
                    "confidence {} out of bounds for {:?}",
                    result.confidence,
                    content
                );
            }
        }
    }

    #[tokio::test]
    async fn test_analyze_article_joins_title_and_snippet() {
        let result = analyzer()
            .analyze_article(
                "Acme announces layoffs",
                "The startup is shutting down two offices.",
            )
            .await;
        assert_eq!(result.classification, Classification::Significant);
        assert_eq!(result.validation, ValidationOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_disabled_validator_skips() {
        let result = analyzer()
            .analyze("acme announced layoffs and is shutting down", None)
            .await;
        assert_eq!(result.validation, ValidationOutcome::Skipped);
        // Identical to the pure keyword path
        let keyword_only =
            analyzer().analyze_keywords("acme announced layoffs and is shutting down", None);
        assert_eq!(result, keyword_only);
    }

    #[tokio::test]
    async fn test_validator_override_applied() {
        let server = MockServer::start().await;
        let reply = r#"{"classification": "insignificant", "sentiment": "neutral", "confidence": 0.9, "reasoning": "Archived press release, not a new event"}"#;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(llm_reply(reply)))
            .expect(1)
            .mount(&server)
            .await;

        let result = llm_analyzer(&server.uri())
            .analyze(
                "acme announced layoffs and is shutting down its berlin office",
                Some(ChangeMagnitude::Moderate),
            )
            .await;

        assert_eq!(result.classification, Classification::Insignificant);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 0.9).abs() < 1e-9);
        assert_eq!(
            result.notes.as_deref(),
            Some("Archived press release, not a new event")
        );
        assert_eq!(result.validation, ValidationOutcome::Applied);
        // Keyword evidence survives the override
        assert!(result.matched_keywords.contains(&"layoffs".to_string()));
    }

    #[tokio::test]
    async fn test_validator_failure_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let content = "acme announced layoffs and is shutting down its berlin office";
        let result = llm_analyzer(&server.uri())
            .analyze(content, Some(ChangeMagnitude::Moderate))
            .await;

        let mut expected = analyzer().analyze_keywords(content, Some(ChangeMagnitude::Moderate));
        expected.validation = ValidationOutcome::Failed;
        assert_eq!(result, expected);
    }
}
