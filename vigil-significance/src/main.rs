//! Vigil Significance - Business-significance analysis service for the
//! Vigil monitoring ecosystem.
//!
//! Classifies website-content changes and news articles through a keyword
//! rule engine, with optional LLM validation of the verdicts.

use anyhow::Result;
use vigil_common::config::Config;
use vigil_common::logging::init_logging;
use vigil_significance::SignificanceService;

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Vigil Significance v{}", env!("CARGO_PKG_VERSION"));

    // Start the analysis service
    let service = SignificanceService::new(config);

    // Log startup timing before entering the server loop
    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
