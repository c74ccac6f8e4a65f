//! Vigil Significance Library
//!
//! Classifies website-content changes and news articles by business
//! significance for portfolio monitoring. The core is a pure keyword
//! pipeline with an optional LLM validation pass layered on top.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                vigil-significance (Rust Service)            │
//! │                          :4436                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────┐    │
//! │  │  Keyword    │  │  Rule       │  │  LLM Validator   │    │
//! │  │  Pipeline   │  │  Engine     │  │  (optional)      │    │
//! │  └─────────────┘  └─────────────┘  └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Keyword Pipeline
//! - **Matcher**: locates dictionary phrases with surrounding context
//! - **Qualifier**: flags negated and false-positive occurrences
//! - **Classifier**: first-match-wins rule table over polarity counts
//!
//! ## Change Magnitude
//! - Character-level similarity ratio between snapshots
//! - `minor` (>= 0.90), `moderate` (>= 0.50), `major` (< 0.50)
//!
//! ## Validation Fallback
//! - The validator may override a keyword-only verdict
//! - Any validator failure degrades the item to its keyword-only result

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analyzer;
pub mod classify;
pub mod differ;
pub mod keywords;
pub mod matcher;
pub mod qualifier;
pub mod routes;
pub mod types;
pub mod validator;

mod util;

use anyhow::Result;
use axum::{routing::get, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use vigil_common::config::Config;

use crate::analyzer::SignificanceAnalyzer;
use crate::validator::{LlmValidator, LlmValidatorConfig, SignificanceValidator};

/// Significance service state
pub struct ServiceState {
    /// Configuration
    pub config: Config,
    /// The analysis façade
    pub analyzer: SignificanceAnalyzer,
}

impl ServiceState {
    /// Create a new service state
    pub fn new(config: Config) -> Self {
        let validator: Arc<dyn SignificanceValidator> = if config.validator.enabled {
            Arc::new(LlmValidator::new(LlmValidatorConfig::from(
                &config.validator,
            )))
        } else {
            Arc::new(validator::NoopValidator)
        };

        let analyzer = SignificanceAnalyzer::new(validator);

        Self { config, analyzer }
    }
}

/// Main significance service
pub struct SignificanceService {
    state: Arc<ServiceState>,
}

impl SignificanceService {
    /// Create a new significance service
    pub fn new(config: Config) -> Self {
        let state = Arc::new(ServiceState::new(config));
        Self { state }
    }

    /// Start the significance service
    pub async fn start(self) -> Result<()> {
        let host = self.state.config.server.bind.clone();
        let port = self.state.config.server.port;

        // Build HTTP routes
        let app = Router::new()
            .route("/health", get(routes::health))
            .route("/api/v1/analyze/content", post(routes::analyze_content))
            .route("/api/v1/analyze/article", post(routes::analyze_article))
            .with_state(self.state.clone());

        // Start HTTP server
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        tracing::info!(
            address = %addr,
            validation_enabled = self.state.config.validator.enabled,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
