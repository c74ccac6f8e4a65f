//! External validator capability: an optional, higher-cost reasoning step
//! that may override the keyword-only verdict.
//!
//! Two implementations exist: [`LlmValidator`] calls a network-backed
//! reasoning service, and [`NoopValidator`] stands in when validation is
//! disabled so the analyzer needs no runtime feature-flag branching.
//! Failure is always an explicit [`ValidatorError`], never an overloaded
//! null: callers that get `Err` fall back to the keyword-only result.

pub mod bridge;

pub use bridge::{LlmValidator, LlmValidatorConfig};

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::types::{ChangeMagnitude, Classification, ExternalValidationResult};

/// What the analyzer hands to the validator for a second opinion.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRequest {
    /// Content excerpt, truncated by the analyzer to 2000 characters
    pub content_excerpt: String,
    /// Qualifying keywords from the keyword-only pass
    pub keywords: Vec<String>,
    /// Categories of those keywords
    pub categories: Vec<String>,
    /// The keyword-only verdict being validated
    pub initial_classification: Classification,
    /// Change magnitude, absent for news-article analysis
    pub magnitude: Option<ChangeMagnitude>,
}

/// Validator failure modes. All of them mean "use the keyword-only result".
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The capability is disabled or unconfigured
    #[error("validator is disabled")]
    Disabled,

    /// The request did not complete in time
    #[error("validation timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure (connection, TLS, ...)
    #[error("validator request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("validator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be interpreted
    #[error("malformed validator response: {0}")]
    MalformedResponse(String),
}

/// Capability interface for second-opinion validation.
#[async_trait]
pub trait SignificanceValidator: Send + Sync {
    /// Whether the analyzer should invoke this validator at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Request a validation verdict for one analysis.
    async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ExternalValidationResult, ValidatorError>;
}

/// Stand-in used when validation is disabled; never performs any I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

#[async_trait]
impl SignificanceValidator for NoopValidator {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn validate(
        &self,
        _request: &ValidationRequest,
    ) -> Result<ExternalValidationResult, ValidatorError> {
        Err(ValidatorError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_validator_declines() {
        let validator = NoopValidator;
        assert!(!validator.is_enabled());

        let request = ValidationRequest {
            content_excerpt: "anything".to_string(),
            keywords: vec![],
            categories: vec![],
            initial_classification: Classification::Uncertain,
            magnitude: None,
        };
        let err = validator.validate(&request).await.unwrap_err();
        assert!(matches!(err, ValidatorError::Disabled));
    }
}
