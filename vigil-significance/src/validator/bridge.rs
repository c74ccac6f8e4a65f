//! HTTP bridge to the LLM reasoning service used for validation.
//!
//! Sends one deterministic request (temperature 0, bounded output) per
//! validation and parses the JSON verdict out of the model's reply. Retry
//! and backoff policy belongs to the calling pipeline, not this bridge: a
//! failed attempt surfaces immediately as a [`ValidatorError`] and the
//! analyzer degrades to its keyword-only result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{SignificanceValidator, ValidationRequest, ValidatorError};
use crate::types::{Classification, ExternalValidationResult, Sentiment};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const VALIDATION_SYSTEM_PROMPT: &str = "You are analyzing website content changes for a venture capital portfolio monitoring system.\n\
Your task is to validate whether detected changes are genuinely significant for business monitoring purposes.\n\n\
Respond with a JSON object containing:\n\
- classification: \"significant\", \"insignificant\", or \"uncertain\"\n\
- sentiment: \"positive\", \"negative\", \"neutral\", or \"mixed\"\n\
- confidence: float between 0.0 and 1.0\n\
- reasoning: brief explanation of your classification\n\
- validated_keywords: list of keywords you confirm are relevant\n\
- false_positives: list of keywords that are false positives";

/// Configuration for the LLM validator bridge.
#[derive(Debug, Clone)]
pub struct LlmValidatorConfig {
    /// API endpoint
    pub endpoint: String,
    /// API key, sent as `x-api-key` when present
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Maximum response tokens
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LlmValidatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com".to_string(),
            api_key: None,
            model: "claude-haiku-4-5-20250924".to_string(),
            max_tokens: 500,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&vigil_common::config::ValidatorConfig> for LlmValidatorConfig {
    fn from(config: &vigil_common::config::ValidatorConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Network-backed validator speaking the messages API.
pub struct LlmValidator {
    config: LlmValidatorConfig,
    client: reqwest::Client,
}

impl LlmValidator {
    /// Create a new validator bridge with the given configuration.
    pub fn new(config: LlmValidatorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { config, client }
    }

    /// Build the user prompt for a validation request.
    fn build_user_prompt(&self, request: &ValidationRequest) -> String {
        format!(
            "Analyze this content change:\n\n\
             Content excerpt:\n{}\n\n\
             Detected keywords: {}\n\
             Detected categories: {}\n\
             Initial classification: {}\n\
             Change magnitude: {}\n\n\
             Validate whether this change is genuinely significant for a VC portfolio monitoring system.\n\
             Respond with JSON only.",
            request.content_excerpt,
            request.keywords.join(", "),
            request.categories.join(", "),
            request.initial_classification,
            request
                .magnitude
                .map(|m| m.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        )
    }

    /// Send a single request to the messages API.
    async fn send(&self, user_prompt: &str) -> Result<String, ValidatorError> {
        let url = format!("{}/v1/messages", self.config.endpoint);
        debug!(url = %url, model = %self.config.model, "Sending validation request");

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: 0.0,
            system: VALIDATION_SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        };

        let mut request = self
            .client
            .post(&url)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ValidatorError::Timeout(self.config.timeout)
            } else {
                ValidatorError::Transport(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ValidatorError::Status { status, body });
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ValidatorError::MalformedResponse(e.to_string()))?;

        reply
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| ValidatorError::MalformedResponse("empty content".to_string()))
    }

    /// Parse the model's reply into a structured validation result.
    fn parse_validation_response(
        &self,
        content: &str,
    ) -> Result<ExternalValidationResult, ValidatorError> {
        let json_str = extract_json(content)
            .ok_or_else(|| ValidatorError::MalformedResponse("no JSON in reply".to_string()))?;

        let parsed: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| ValidatorError::MalformedResponse(e.to_string()))?;

        // Extract fields with fallbacks
        let classification = parse_classification(
            parsed
                .get("classification")
                .and_then(|v| v.as_str())
                .unwrap_or("uncertain"),
        );

        let sentiment = parse_sentiment(
            parsed
                .get("sentiment")
                .and_then(|v| v.as_str())
                .unwrap_or("neutral"),
        );

        let confidence = parsed
            .get("confidence")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.5)
            .clamp(0.0, 1.0);

        let reasoning = parsed
            .get("reasoning")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Ok(ExternalValidationResult {
            classification,
            sentiment,
            confidence,
            reasoning,
            validated_keywords: string_list(&parsed, "validated_keywords"),
            false_positives: string_list(&parsed, "false_positives"),
        })
    }
}

#[async_trait]
impl SignificanceValidator for LlmValidator {
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ExternalValidationResult, ValidatorError> {
        let user_prompt = self.build_user_prompt(request);
        let reply = self.send(&user_prompt).await?;
        self.parse_validation_response(&reply)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

// ============================================================================
// Parsing Helpers
// ============================================================================

/// Extract JSON from a reply that may wrap it in markdown code blocks.
fn extract_json(content: &str) -> Option<String> {
    // Try to find JSON in code blocks first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Some(content[start..start + end].trim().to_string());
        }
    }

    // Try to find raw JSON by matching braces
    if let Some(start) = content.find('{') {
        let mut depth = 0usize;
        for (i, c) in content[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(content[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }
    }

    None
}

fn parse_classification(s: &str) -> Classification {
    match s.to_lowercase().as_str() {
        "significant" => Classification::Significant,
        "insignificant" => Classification::Insignificant,
        _ => Classification::Uncertain,
    }
}

fn parse_sentiment(s: &str) -> Sentiment {
    match s.to_lowercase().as_str() {
        "positive" => Sentiment::Positive,
        "negative" => Sentiment::Negative,
        "mixed" => Sentiment::Mixed,
        _ => Sentiment::Neutral,
    }
}

fn string_list(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
