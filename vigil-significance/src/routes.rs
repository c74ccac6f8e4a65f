//! HTTP routes for the significance service.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::differ;
use crate::types::{AnalysisResult, ChangeMagnitude};
use crate::ServiceState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// Content analysis request. Pipelines that already computed a magnitude
/// pass it directly; otherwise the previous snapshot can be supplied and
/// the service derives the magnitude itself.
#[derive(Debug, Deserialize)]
pub struct AnalyzeContentRequest {
    pub content: String,
    /// Precomputed change magnitude; takes precedence over derivation
    #[serde(default)]
    pub magnitude: Option<ChangeMagnitude>,
    #[serde(default)]
    pub previous_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeContentResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Magnitude used by the classifier, when one could be derived
    pub magnitude: Option<ChangeMagnitude>,
    /// Similarity ratio against the previous snapshot, when supplied
    pub similarity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeArticleRequest {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: "vigil-significance".to_string(),
    })
}

/// Analyze a content snapshot for business significance.
pub async fn analyze_content(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<AnalyzeContentRequest>,
) -> Result<Json<AnalyzeContentResponse>, StatusCode> {
    let (magnitude, similarity) = match (request.magnitude, &request.previous_content) {
        (Some(magnitude), _) => (Some(magnitude), None),
        (None, Some(previous)) => {
            let ratio = differ::similarity_ratio(previous, &request.content);
            (Some(differ::magnitude_for(ratio)), Some(ratio))
        }
        (None, None) => (None, None),
    };

    let result = state.analyzer.analyze(&request.content, magnitude).await;

    Ok(Json(AnalyzeContentResponse {
        result,
        magnitude,
        similarity,
    }))
}

/// Analyze a news article by headline and snippet.
pub async fn analyze_article(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<AnalyzeArticleRequest>,
) -> Result<Json<AnalysisResult>, StatusCode> {
    let result = state
        .analyzer
        .analyze_article(&request.title, &request.snippet)
        .await;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_shape() {
        let Json(response) = health().await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "vigil-significance");
    }

    #[test]
    fn test_analyze_content_request_defaults() {
        let request: AnalyzeContentRequest =
            serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(request.content, "hello");
        assert!(request.magnitude.is_none());
        assert!(request.previous_content.is_none());
    }

    #[test]
    fn test_analyze_content_request_with_magnitude() {
        let request: AnalyzeContentRequest =
            serde_json::from_str(r#"{"content": "hello", "magnitude": "major"}"#).unwrap();
        assert_eq!(request.magnitude, Some(crate::types::ChangeMagnitude::Major));
    }

    #[tokio::test]
    async fn test_analyze_content_prefers_supplied_magnitude() {
        use vigil_common::config::Config;

        let state = Arc::new(crate::ServiceState::new(Config::default()));
        let request = AnalyzeContentRequest {
            content: "the company confirmed layoffs this morning".to_string(),
            magnitude: Some(ChangeMagnitude::Major),
            // A near-identical previous snapshot would derive minor
            previous_content: Some("the company confirmed layoffs this morning!".to_string()),
        };

        let Json(response) = analyze_content(State(state), Json(request)).await.unwrap();
        assert_eq!(response.magnitude, Some(ChangeMagnitude::Major));
        assert!(response.similarity.is_none());
        // Single negative keyword with a major change escalates
        assert!((response.result.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_article_request_defaults() {
        let request: AnalyzeArticleRequest =
            serde_json::from_str(r#"{"title": "Acme raises series B"}"#).unwrap();
        assert_eq!(request.snippet, "");
    }
}
