//! SentinelX incident-response service

use anyhow::Context;
use sentinel_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    init_tracing(&config).context("Failed to initialize tracing")?;

    info!(
        environment = %config.service.environment,
        accounts = config.seed.len(),
        "Starting SentinelX incident-response service"
    );

    let app = router(AppState::new(config.clone()));

    Server::new(config)
        .serve(app)
        .await
        .context("Server terminated with an error")?;

    Ok(())
}
