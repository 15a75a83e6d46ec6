//! Deadlock Analyzer Server
//!
//! Serves the REST API with configuration taken from the environment.

use deadlock_analyzer::rest_api::{RestApiConfig, RestApiServer};
use deadlock_analyzer::{logging, Analyzer, DetectorConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DetectorConfig::from_env()?;
    logging::init(&config.logging)?;

    let api_config = RestApiConfig::from_detector_config(&config)?;
    let analyzer = Analyzer::new(config.limits);

    tracing::info!(
        environment = ?config.environment,
        max_processes = config.limits.max_processes,
        max_resources = config.limits.max_resources,
        "deadlock analyzer configured"
    );

    RestApiServer::new(api_config, analyzer).start().await?;

    Ok(())
}
