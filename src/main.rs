use contact_gateway::config::GatewayConfig;
use contact_gateway::observability::init_tracing;
use contact_gateway::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing("info");

    let config = GatewayConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    tracing::info!(
        environment = %config.common.environment,
        variant = ?config.variant,
        deployment = ?config.deployment,
        pushover_configured = !config.pushover.user_key.is_empty(),
        "Starting contact gateway"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
