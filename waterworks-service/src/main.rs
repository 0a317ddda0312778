use service_core::observability::init_tracing;
use waterworks_service::config::WaterworksConfig;
use waterworks_service::services::init_metrics;
use waterworks_service::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = WaterworksConfig::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
